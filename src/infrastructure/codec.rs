//! 传输编码
//!
//! 源代码上传和判题结果回传都使用标准 base64
//!
//! 判题端回传的内容可能按 60 列换行，也可能省略填充，解码时都接受

use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::error::{SubmitError, SubmitResult};

/// 将 UTF-8 文本编码为 base64
pub fn encode(input: &str) -> String {
    STANDARD.encode(input.as_bytes())
}

/// 解码用引擎：标准字母表，填充可有可无
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// 将 base64 解码为 UTF-8 文本
///
/// 忽略所有 ASCII 空白（包括中间的换行）。`field` 仅用于错误信息
pub fn decode(field: &str, input: &str) -> SubmitResult<String> {
    let cleaned: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = LENIENT
        .decode(cleaned)
        .map_err(|e| SubmitError::decode(field, e))?;
    String::from_utf8(bytes).map_err(|e| SubmitError::decode(field, e))
}
