use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use judge_submit::utils::logging;
use judge_submit::{App, Config};

/// judge-submit - 提交解决方案到在线判题并展示结果
#[derive(Parser, Debug)]
#[command(name = "judge-submit")]
#[command(version, about, long_about = None)]
struct Cli {
    /// 配置文件路径（TOML）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 提交一个或多个解决方案文件
    Submit {
        /// 解决方案文件
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// 保存令牌和用户ID
    Login {
        #[arg(long, env = "JUDGE_AUTH_TOKEN")]
        token: String,
        #[arg(long, env = "JUDGE_USER_ID")]
        user_id: String,
    },

    /// 清除已保存的凭据
    Logout,

    /// 同步模块得分到本地题库
    SyncScores {
        /// 模块ID
        module_id: String,
    },

    /// 查看文件头解析结果
    Show {
        /// 解决方案文件
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load(cli.config.as_deref())?;
    config.verbose_logging |= cli.verbose;

    // 初始化日志
    logging::init(config.verbose_logging);

    let app = App::initialize(config).await?;

    match cli.command {
        Commands::Submit { files } => {
            let stats = app.submit_files(files).await?;
            if stats.accepted < stats.total {
                bail!("{}/{} 个文件未通过", stats.total - stats.accepted, stats.total);
            }
        }
        Commands::Login { token, user_id } => app.login(&token, &user_id).await?,
        Commands::Logout => app.logout().await?,
        Commands::SyncScores { module_id } => {
            let updated = app.sync_scores(&module_id).await?;
            info!("✓ 模块 {} 同步完成，更新 {} 道题目", module_id, updated);
        }
        Commands::Show { file } => {
            app.show(&file).await?;
        }
    }

    Ok(())
}
