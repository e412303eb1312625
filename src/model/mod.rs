mod envelope;
mod host;
mod invocation;

pub use self::envelope::{Envelope, Status};
pub use self::host::{HostBinding, HostId, HostRecord};
pub use self::invocation::{
    Descriptor, HostSetup, InvocationDetail, InvocationId, InvocationSummary,
};
