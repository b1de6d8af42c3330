//! Prompt templates for Yoyaku.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.
//! Templates use `{{title}}` and `{{transcript}}` placeholders plus any
//! variables from the config.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub summary: SummaryPrompts,
    pub structured: StructuredPrompts,
    pub detail: DetailPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for the Markdown summary and its highlights follow-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPrompts {
    pub user: String,
    /// Sent in the same conversation after an accepted summary.
    pub highlights: String,
}

impl Default for SummaryPrompts {
    fn default() -> Self {
        Self {
            user: r#"あなたは字幕ファイルから話された時刻を正確に読み取り、読みやすい要約を作る専門家です。
以下の字幕を日本語で、元の文章の半分から三分の二程度の分量を目安に、Markdown形式で詳しく要約してください（全体で1万字以内）。

- 常体で書き、字幕の誤字は文意に沿って直すこと。
- 結論だけでなく、そこに至る論拠や具体例、重要な用語も残すこと。
- 重要な点は箇条書きで整理すること。
- 見出しだけを読んでも流れが分かるよう、大見出しと小見出しを付けること。

タイムスタンプの規則:
- 各見出しには、その話題が話され始めたおおよその時刻を「（動画：M分SS秒頃）」の形式で付けること。1時間を超える場合は「（動画：H時間M分SS秒頃）」とする。
- 例えば字幕の 00:16:27.182 は「動画：16分27秒頃」となる。時刻の読み違いは重大なので正確に。
- 同じ時刻を二度使わないこと。動画の最後まで話題を拾うこと。
- 手順や複数の項目を説明する場合も、時刻付きの項目は「###」または「####」の見出しとして独立させ、説明文はその下に置くこと。

例:
### 鱗の除去（動画：5分50秒頃）
切り身に残った鱗を丁寧に取り除く。

### 小骨の除去（動画：6分11秒頃）
中骨に沿って並ぶ小骨を抜き取る。

タイトルは「{{title}}」を日本語にしたものを使うこと。
この指示への返答は不要です。内容のみを出力し、最後に「以上」と書いてください。

{{transcript}}"#
                .to_string(),

            highlights: r#"では、その内容の興味深いポイントを200文字程度の日本語でまとめて。「動画のポイント」という見出しを付けて。
全体の要約ではなく、この動画に興味を持つ人が特に知りたくなるような特徴的な点を選んで。こちらは文末の「以上」は不要です。"#
                .to_string(),
        }
    }
}

/// Prompt for the JSON section layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredPrompts {
    pub user: String,
}

impl Default for StructuredPrompts {
    fn default() -> Self {
        Self {
            user: r#"以下の字幕を読み、日本語で構造化された要約を作成してください。

- title: 「{{title}}」を日本語にしたタイトル
- summary: 動画全体の概要（数文）
- sections: 話題ごとの配列。各要素は
  - heading: 話題の見出し
  - timestamp_seconds: その話題が始まるおおよその時刻（秒、整数）
  - content: 論拠や具体例を含む詳しい説明（箇条書き可）

時刻は字幕の時刻から正確に読み取り、同じ値を二度使わず、動画の最後まで話題を拾ってください。

{{transcript}}"#
                .to_string(),
        }
    }
}

/// Prompt for the cleaned full-transcript detail block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailPrompts {
    pub user: String,
}

impl Default for DetailPrompts {
    fn default() -> Self {
        Self {
            user: r#"字幕ファイルを整形し、必要なら和訳して、読みやすい日本語の文章にしてください。
内容は省略せず、誤字や文意から見て明らかな言い間違い、重複は取り除いて整理し、見出しを付けてください。
この指示への返答は不要です。内容のみを出力し、最後に「以上」と書いてください。
タイトルは「{{title}}」です。

{{transcript}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let summary_path = custom_path.join("summary.toml");
            if summary_path.exists() {
                let content = std::fs::read_to_string(&summary_path)?;
                prompts.summary = toml::from_str(&content)?;
            }

            let structured_path = custom_path.join("structured.toml");
            if structured_path.exists() {
                let content = std::fs::read_to_string(&structured_path)?;
                prompts.structured = toml::from_str(&content)?;
            }

            let detail_path = custom_path.join("detail.toml");
            if detail_path.exists() {
                let content = std::fs::read_to_string(&detail_path)?;
                prompts.detail = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }

    /// Fill `{{title}}` and `{{transcript}}` in `template`.
    pub fn for_video(&self, template: &str, title: &str, transcript: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("title".to_string(), title.to_string());
        vars.insert("transcript".to_string(), transcript.to_string());
        self.render_with_custom(template, &vars)
    }
}
