//! Dynamic invocation of a service's load-by-guid operation.

use flowkit_domain::entity::LoadedEntity;
use uuid::Uuid;

use super::LoadError;
use crate::ports::ServiceInstance;

/// Load `guid` through `service`.
///
/// Returns `None` when the service has no load-by-guid operation, when the
/// operation fails, or when nothing has that guid.
pub async fn load(service: &mut dyn ServiceInstance, guid: Uuid) -> Option<LoadedEntity> {
    try_load(service, guid).await.ok().flatten()
}

pub(crate) async fn try_load(
    service: &mut dyn ServiceInstance,
    guid: Uuid,
) -> Result<Option<LoadedEntity>, LoadError> {
    let name = service.service_name().to_string();
    let Some(operation) = service.load_by_guid() else {
        return Err(LoadError::NoEligibleLoadOperation { service: name });
    };
    operation
        .get(guid)
        .await
        .map_err(|source| LoadError::InvocationFault {
            service: name,
            source,
        })
}
