use async_trait::async_trait;
use serde_json::Value;

use crate::errors::FetchError;

/// Instruction appended to the category name to form the remote query.
pub const QUERY_SUFFIX: &str = "品类的市场洞察和关键信息";

pub fn build_query(category: &str) -> String {
    format!("{category}{QUERY_SUFFIX}")
}

/// Remote knowledge-query service returning raw, unnormalized payloads.
///
/// Implementations make exactly one attempt per call.
#[async_trait]
pub trait InsightSource: Send + Sync {
    async fn fetch(&self, category: &str) -> Result<Value, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::build_query;

    #[test]
    fn query_appends_instruction_to_category() {
        assert_eq!(build_query("抗生素"), "抗生素品类的市场洞察和关键信息");
    }
}
