//! 域名关联服务

use std::sync::Arc;
use std::time::Duration;

use opencap_resolver::{validate_domain, DomainAdvertisement, ResolverError};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;

/// 域名关联服务
///
/// 每次关联都重新解析 DNS，并把结果写回公钥槽位：
/// 有公钥则覆盖，无公钥则删除。
pub struct DomainService {
    ctx: Arc<ServiceContext>,
    timeout: Duration,
}

impl DomainService {
    /// 创建域名服务实例，`timeout` 为单次解析的截止时间
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, timeout: Duration) -> Self {
        Self { ctx, timeout }
    }

    /// 解析域名并同步公钥
    pub async fn associate(&self, domain: &str) -> CoreResult<DomainAdvertisement> {
        let domain = validate_domain(domain)?;

        let advertisement =
            match tokio::time::timeout(self.timeout, self.ctx.resolver.resolve(&domain)).await {
                Ok(result) => result?,
                Err(_) => {
                    return Err(CoreError::Resolution(ResolverError::Timeout {
                        domain,
                        after_secs: self.timeout.as_secs(),
                    }))
                }
            };

        match advertisement.public_key {
            Some(key) => {
                self.ctx.registry.set_public_key(&domain, &key).await?;
                log::info!("Public key stored for {domain}");
            }
            None => {
                if self.ctx.registry.delete_public_key(&domain).await? {
                    log::info!("Public key revoked for {domain}");
                }
            }
        }

        Ok(advertisement)
    }

    /// 获取已保存的域名公钥
    pub async fn public_key(&self, domain: &str) -> CoreResult<Vec<u8>> {
        let domain = validate_domain(domain)?;
        self.ctx
            .registry
            .get_public_key(&domain)
            .await?
            .ok_or(CoreError::DomainNotFound(domain))
    }
}
