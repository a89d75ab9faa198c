//! 班级加入码生成器
//!
//! 支持两种策略：
//! - `hex`: 3 个随机字节，渲染为 6 位大写十六进制
//! - `word_pair`: 从内置法语词表中随机抽取两个长度大于 3 的单词拼接

use once_cell::sync::Lazy;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::debug;

use super::french_words::FRENCH_WORDS;
use crate::config::ClassCodeConfig;
use crate::errors::{AppError, Result};

// 过滤掉过短的单词
static CODE_WORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    FRENCH_WORDS
        .iter()
        .copied()
        .filter(|w| w.chars().count() > 3)
        .collect()
});

const FALLBACK_WORD: &str = "classe";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeStrategy {
    Hex,
    WordPair,
}

#[derive(Debug, Clone)]
pub struct CodeGenerator {
    strategy: CodeStrategy,
    max_attempts: u32,
}

impl CodeGenerator {
    pub fn new(strategy: CodeStrategy, max_attempts: u32) -> Self {
        Self {
            strategy,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_config(config: &ClassCodeConfig) -> Self {
        Self::new(config.strategy, config.max_attempts)
    }

    pub fn strategy(&self) -> CodeStrategy {
        self.strategy
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// 生成一个候选加入码，不检查唯一性
    pub fn generate(&self) -> String {
        let mut rng = rand::rng();
        match self.strategy {
            CodeStrategy::Hex => {
                let mut bytes = [0u8; 3];
                rng.fill(&mut bytes);
                bytes.iter().map(|b| format!("{b:02X}")).collect()
            }
            CodeStrategy::WordPair => {
                let first = CODE_WORDS.choose(&mut rng).copied().unwrap_or(FALLBACK_WORD);
                let second = CODE_WORDS.choose(&mut rng).copied().unwrap_or(FALLBACK_WORD);
                format!("{}{}", first.to_lowercase(), second.to_lowercase())
            }
        }
    }

    /// 生成一个 `exists` 判定为未占用的加入码
    ///
    /// 最多尝试 `max_attempts` 次，全部被占用时返回 `CodeSpaceExhausted`。
    pub async fn generate_unique<F, Fut>(&self, mut exists: F) -> Result<String>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        for attempt in 1..=self.max_attempts {
            let code = self.generate();
            if !exists(code.clone()).await? {
                return Ok(code);
            }
            debug!(
                "Class code {} already taken (attempt {}/{})",
                code, attempt, self.max_attempts
            );
        }

        Err(AppError::code_space_exhausted(format!(
            "Unable to generate a unique class code after {} attempts",
            self.max_attempts
        )))
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::from_config(&ClassCodeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hex_code_format() {
        let generator = CodeGenerator::new(CodeStrategy::Hex, 4);
        for _ in 0..50 {
            let code = generator.generate();
            assert_eq!(code.len(), 6);
            assert!(
                code.chars()
                    .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
            );
        }
    }

    #[test]
    fn test_word_pair_uses_long_words() {
        assert!(!CODE_WORDS.is_empty());
        assert!(CODE_WORDS.iter().all(|w| w.chars().count() > 3));
        // 词表中确实存在需要被过滤的短词
        assert!(FRENCH_WORDS.iter().any(|w| w.chars().count() <= 3));

        let generator = CodeGenerator::new(CodeStrategy::WordPair, 4);
        for _ in 0..50 {
            let code = generator.generate();
            assert_eq!(code, code.to_lowercase());
            assert!(code.len() >= 8);
            assert!(
                CODE_WORDS
                    .iter()
                    .any(|w| code.starts_with(w) && CODE_WORDS.iter().any(|x| *x == &code[w.len()..]))
            );
        }
    }

    #[test]
    fn test_strategy_deserialize() {
        let strategy: CodeStrategy = serde_json::from_str("\"word_pair\"").unwrap();
        assert_eq!(strategy, CodeStrategy::WordPair);
        let strategy: CodeStrategy = serde_json::from_str("\"hex\"").unwrap();
        assert_eq!(strategy, CodeStrategy::Hex);
    }

    #[tokio::test]
    async fn test_generate_unique_skips_taken_codes() {
        let generator = CodeGenerator::new(CodeStrategy::Hex, 16);
        let mut seen = Vec::new();
        let mut calls = 0;

        let code = generator
            .generate_unique(|candidate| {
                calls += 1;
                // 前三个候选视为已占用
                let taken = calls <= 3;
                if taken {
                    seen.push(candidate);
                }
                async move { Ok(taken) }
            })
            .await
            .unwrap();

        assert_eq!(calls, 4);
        assert_eq!(seen.len(), 3);
        assert_eq!(code.len(), 6);
    }

    #[tokio::test]
    async fn test_generate_unique_exhaustion() {
        let generator = CodeGenerator::new(CodeStrategy::WordPair, 5);
        let mut calls = 0;

        let result = generator
            .generate_unique(|_| {
                calls += 1;
                async { Ok(true) }
            })
            .await;

        assert!(matches!(result, Err(AppError::CodeSpaceExhausted(_))));
        assert_eq!(calls, 5);
    }

    #[tokio::test]
    async fn test_generate_unique_never_returns_existing() {
        let generator = CodeGenerator::new(CodeStrategy::Hex, 64);
        let mut taken: HashSet<String> = HashSet::new();

        for _ in 0..100 {
            let snapshot = taken.clone();
            let code = generator
                .generate_unique(|candidate| {
                    let exists = snapshot.contains(&candidate);
                    async move { Ok(exists) }
                })
                .await
                .unwrap();
            assert!(taken.insert(code));
        }
    }

    #[tokio::test]
    async fn test_generate_unique_propagates_check_error() {
        let generator = CodeGenerator::new(CodeStrategy::Hex, 3);
        let result = generator
            .generate_unique(|_| async { Err(AppError::database_operation("down")) })
            .await;
        assert!(matches!(result, Err(AppError::DatabaseOperation(_))));
    }
}
