pub mod identity_index;
pub mod meta_cache;
pub mod presenter;
pub mod score_sync;
pub mod solution_file;
pub mod verdict_aggregator;
pub mod verdict_poller;

pub use identity_index::IdentityIndex;
pub use meta_cache::MetaCache;
pub use presenter::{ConsolePresenter, VerdictPresenter};
pub use score_sync::ScoreSync;
pub use solution_file::{HeaderParser, SolutionFile};
pub use verdict_aggregator::is_accepted_status;
pub use verdict_poller::{RetryPolicy, VerdictPoller};
