// GroupScout - app/source.rs
//
// The remote log group service as seen by the controller.
//
// Implementations are called from background search threads, one call per
// request, so they must be `Send + Sync` and must not assume calls arrive in
// order. The service is treated as stateless and idempotent per call.

use crate::core::model::{DescribeLogGroupsRequest, RemoteError};

/// A searchable, region-scoped namespace of log group names.
pub trait LogGroupSource: Send + Sync {
    /// Return the names in `request.region` starting with
    /// `request.log_group_name_prefix`, at most `request.limit` of them.
    fn describe_log_groups(
        &self,
        request: &DescribeLogGroupsRequest,
    ) -> Result<Vec<String>, RemoteError>;
}

impl<F> LogGroupSource for F
where
    F: Fn(&DescribeLogGroupsRequest) -> Result<Vec<String>, RemoteError> + Send + Sync,
{
    fn describe_log_groups(
        &self,
        request: &DescribeLogGroupsRequest,
    ) -> Result<Vec<String>, RemoteError> {
        self(request)
    }
}
