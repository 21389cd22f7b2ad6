//! Delegation: forward a host's interface members to an embedded field.

pub mod matcher;
pub mod synth;

pub use matcher::{plan_host, HostPlan, InterfacePlan, MemberPlan, Resolution, SourceMember};
pub use synth::synthesize;
