//! 解决方案文件 - 业务能力层
//!
//! 读取本地解决方案文件，并从开头的注释行解析题目元数据。
//! 文件头格式：
//!
//! ```text
//! // Two Sum (Q1)
//! // sectionId: S1
//! // moduleId: M1
//! // languageName: Java (OpenJDK 13.0.1)
//! // languageId: 62
//! ```

use std::path::{Path, PathBuf};

use regex::Regex;
use tokio::fs;

use crate::error::{SubmitError, SubmitResult};
use crate::models::ProblemMeta;

/// 最多扫描的行数
const MAX_HEADER_LINES: usize = 15;

/// 文件头解析器，持有编译好的正则
#[derive(Debug, Clone)]
pub struct HeaderParser {
    title: Regex,
    loose_title: Regex,
    key_value: Regex,
}

impl HeaderParser {
    pub fn new() -> SubmitResult<Self> {
        Ok(Self {
            title: Regex::new(r"^//\s*(.+?)\s*\(([^)]+)\)\s*$")?,
            loose_title: Regex::new(r"//\s*(.+?)\s*\(([^)]+)\)")?,
            key_value: Regex::new(r"^//\s*([A-Za-z0-9_]+)\s*:\s*(.+?)\s*$")?,
        })
    }

    /// 从文本开头的注释行解析题目元数据
    ///
    /// - `// 标题 (id)`：第一次出现时设置标题和ID
    /// - `// key: value`：key 为 sectionId / moduleId / id / title / languageId / languageName
    ///
    /// 未解析到 id 和标题时，尝试第一行的宽松格式；仍失败则 id 为 "unknown"，标题为文件名。
    pub fn parse(&self, text: &str, file_name: &str) -> ProblemMeta {
        let mut meta = ProblemMeta::default();

        for line in text.lines().take(MAX_HEADER_LINES) {
            let line = line.trim();

            // 已知的 key 优先，避免 "languageName: Java (OpenJDK 13.0.1)" 被当成标题行
            if let Some(caps) = self.key_value.captures(line) {
                let value = caps[2].to_string();
                let slot = match &caps[1] {
                    "sectionId" => Some(&mut meta.section_id),
                    "moduleId" => Some(&mut meta.module_id),
                    "id" => Some(&mut meta.id),
                    "title" => Some(&mut meta.title),
                    "languageName" => Some(&mut meta.language_name),
                    "languageId" => {
                        meta.language_id = value.parse().ok();
                        continue;
                    }
                    _ => None,
                };
                if let Some(slot) = slot {
                    *slot = Some(value);
                    continue;
                }
            }

            if let Some(caps) = self.title.captures(line) {
                if meta.title.is_none() {
                    meta.title = Some(caps[1].to_string());
                }
                if meta.id.is_none() {
                    meta.id = Some(caps[2].trim().to_string());
                }
            }
        }

        if meta.id.is_some() && meta.title.is_some() {
            return meta;
        }

        let first_line = text.lines().next().unwrap_or("");
        if let Some(caps) = self.loose_title.captures(first_line) {
            return ProblemMeta {
                id: Some(caps[2].trim().to_string()),
                title: Some(caps[1].to_string()),
                ..Default::default()
            };
        }

        ProblemMeta {
            id: Some("unknown".to_string()),
            title: Some(file_name.to_string()),
            ..Default::default()
        }
    }
}

/// 已打开的解决方案文件
#[derive(Debug, Clone)]
pub struct SolutionFile {
    pub path: PathBuf,
    pub text: String,
    pub header: ProblemMeta,
}

impl SolutionFile {
    /// 读取文件并解析头部
    pub async fn load(path: &Path, parser: &HeaderParser) -> SubmitResult<Self> {
        let text = fs::read_to_string(path)
            .await
            .map_err(|e| SubmitError::io(path.display().to_string(), e))?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        let header = parser.parse(&text, &file_name);

        Ok(Self {
            path: path.to_path_buf(),
            text,
            header,
        })
    }
}

/// 使用一次性解析器解析文件头
pub fn parse_header(text: &str, file_name: &str) -> SubmitResult<ProblemMeta> {
    Ok(HeaderParser::new()?.parse(text, file_name))
}

/// 生成文件头注释，是 `parse_header` 的逆操作
pub fn render_header(meta: &ProblemMeta) -> String {
    let mut lines = vec![format!(
        "// {} ({})",
        meta.title.as_deref().unwrap_or("Untitled Problem"),
        meta.id.as_deref().unwrap_or("unknown")
    )];
    if let Some(section_id) = &meta.section_id {
        lines.push(format!("// sectionId: {}", section_id));
    }
    if let Some(module_id) = &meta.module_id {
        lines.push(format!("// moduleId: {}", module_id));
    }
    if let Some(language_name) = &meta.language_name {
        lines.push(format!("// languageName: {}", language_name));
    }
    if let Some(language_id) = meta.language_id {
        lines.push(format!("// languageId: {}", language_id));
    }
    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_header() {
        let text = "// Two Sum (Q1)\n// sectionId: S1\n// moduleId: M1\n// languageName: Java (OpenJDK 13.0.1)\n// languageId: 62\n\npublic class Main {}\n";

        let meta = parse_header(text, "Two_Sum.java").unwrap();

        assert_eq!(meta.id.as_deref(), Some("Q1"));
        assert_eq!(meta.title.as_deref(), Some("Two Sum"));
        assert_eq!(meta.section_id.as_deref(), Some("S1"));
        assert_eq!(meta.module_id.as_deref(), Some("M1"));
        assert_eq!(meta.language_id, Some(62));
        assert_eq!(meta.language_name.as_deref(), Some("Java (OpenJDK 13.0.1)"));
    }

    #[test]
    fn test_title_line_only() {
        let meta = parse_header("// Two Sum (Q1)\nclass Main {}", "a.java").unwrap();
        assert_eq!(meta.id.as_deref(), Some("Q1"));
        assert_eq!(meta.title.as_deref(), Some("Two Sum"));
        assert!(meta.module_id.is_none());
        assert!(meta.section_id.is_none());
    }

    #[test]
    fn test_first_title_wins() {
        let meta = parse_header("// First (Q1)\n// Second (Q2)\n", "a.java").unwrap();
        assert_eq!(meta.id.as_deref(), Some("Q1"));
        assert_eq!(meta.title.as_deref(), Some("First"));
    }

    #[test]
    fn test_lines_after_scan_limit_ignored() {
        let mut text = "// Two Sum (Q1)\n".to_string();
        for _ in 0..20 {
            text.push_str("int x;\n");
        }
        text.push_str("// moduleId: M1\n");

        let meta = parse_header(&text, "a.java").unwrap();
        assert!(meta.module_id.is_none());
    }

    #[test]
    fn test_loose_first_line_fallback() {
        let meta = parse_header("int a; // Legacy Title (Q7) trailing\n", "a.java").unwrap();
        assert_eq!(meta.id.as_deref(), Some("Q7"));
        assert_eq!(meta.title.as_deref(), Some("Legacy Title"));
    }

    #[test]
    fn test_unknown_when_no_header() {
        let meta = parse_header("public class Main {}\n", "Main.java").unwrap();
        assert_eq!(meta.id.as_deref(), Some("unknown"));
        assert_eq!(meta.title.as_deref(), Some("Main.java"));
    }

    #[test]
    fn test_render_then_parse() {
        let meta = ProblemMeta {
            id: Some("Q1".to_string()),
            title: Some("Two Sum".to_string()),
            module_id: Some("M1".to_string()),
            section_id: Some("S1".to_string()),
            language_id: Some(62),
            language_name: Some("Java (OpenJDK 13.0.1)".to_string()),
        };

        let text = format!("{}\nclass Main {{}}\n", render_header(&meta));
        assert_eq!(parse_header(&text, "x.java").unwrap(), meta);
    }

    #[tokio::test]
    async fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Two_Sum.java");
        std::fs::write(&path, "// Two Sum (Q1)\nclass Main {}\n").unwrap();

        let parser = HeaderParser::new().unwrap();
        let file = SolutionFile::load(&path, &parser).await.unwrap();

        assert_eq!(file.header.id.as_deref(), Some("Q1"));
        assert!(file.text.contains("class Main"));
    }
}
