//! # 凭据池
//!
//! 运行开始前一次性加载的 API 密钥集合，运行期间只读，可被多个工作线程并发访问。
//!
//! ## 依赖关系
//! - 由 `config/env.rs` 构造
//! - 被 `commands/modify.rs` 使用
//! - 使用 `rand` 进行均匀随机选择

use crate::error::{ModifyError, Result};

use rand::Rng;

/// 凭据变量名前缀
pub const CREDENTIAL_PREFIX: &str = "API_KEY_";

/// 凭据池（非空）
#[derive(Clone)]
pub struct CredentialPool {
    keys: Vec<String>,
}

impl CredentialPool {
    /// 创建凭据池，空集合返回 `NoCredentials`
    pub fn new(keys: Vec<String>) -> Result<Self> {
        if keys.is_empty() {
            return Err(ModifyError::NoCredentials {
                prefix: CREDENTIAL_PREFIX.to_string(),
            });
        }
        Ok(Self { keys })
    }

    /// 使用给定随机源均匀选择一个凭据（有放回）
    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        &self.keys[rng.random_range(0..self.keys.len())]
    }

    /// 使用线程本地随机源选择
    pub fn select_random(&self) -> &str {
        self.select(&mut rand::rng())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

// 不在日志中泄露密钥
impl std::fmt::Debug for CredentialPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPool")
            .field("len", &self.keys.len())
            .finish()
    }
}
