//! 业务逻辑服务层

mod account_service;
mod address_service;
mod domain_service;

pub use account_service::AccountService;
pub use address_service::AddressService;
pub use domain_service::DomainService;

use std::sync::Arc;

use crate::traits::{AddressRegistry, DomainResolver};

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入具体的存储与 DNS 解析实现。
pub struct ServiceContext {
    /// 地址 / 用户 / 公钥存储
    pub registry: Arc<dyn AddressRegistry>,
    /// 域名发现
    pub resolver: Arc<dyn DomainResolver>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(registry: Arc<dyn AddressRegistry>, resolver: Arc<dyn DomainResolver>) -> Self {
        Self { registry, resolver }
    }
}
