//! 文件產生介面

use quote_core::{CompanyProfile, Quote};
use sha2::{Digest, Sha256};

use crate::RenderError;

/// 產生結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub uri: String,
    pub file_name: String,
}

/// 文件產生器
///
/// 實作必須只依賴傳入的報價單與公司資料；相同輸入需得到相同的 uri 與檔名。
pub trait DocumentRenderer {
    fn render(&self, quote: &Quote, company: &CompanyProfile)
        -> Result<RenderedDocument, RenderError>;
}

/// 摘要文件產生器
///
/// 不輸出實際檔案，只以內容指紋決定文件位置，供測試與示範使用。
#[derive(Debug, Clone)]
pub struct SummaryRenderer {
    base_uri: String,
}

impl SummaryRenderer {
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into().trim_end_matches('/').to_string(),
        }
    }

    /// 報價內容與公司資料的 SHA-256 指紋
    pub fn fingerprint(quote: &Quote, company: &CompanyProfile) -> Result<String, RenderError> {
        let payload = serde_json::to_string(&(quote.content_snapshot(), company))
            .map_err(|e| RenderError::Serialization(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(payload.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// 檔名只保留英數字與 `-`、`_`
    fn file_name_for(code: &str) -> String {
        let safe: String = code
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("orcamento-{}.pdf", safe)
    }
}

impl Default for SummaryRenderer {
    fn default() -> Self {
        Self::new("memory://quotes")
    }
}

impl DocumentRenderer for SummaryRenderer {
    fn render(
        &self,
        quote: &Quote,
        company: &CompanyProfile,
    ) -> Result<RenderedDocument, RenderError> {
        if quote.code.trim().is_empty() {
            return Err(RenderError::InvalidInput("報價單編號為空".to_string()));
        }

        let digest = Self::fingerprint(quote, company)?;
        let file_name = Self::file_name_for(&quote.code);

        Ok(RenderedDocument {
            uri: format!("{}/{}/{}", self.base_uri, &digest[..16], file_name),
            file_name,
        })
    }
}
