use crate::domain::like::target::{LikeTarget, TargetKind};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

/// Identifies what is being liked. Used both as the POST body and as the
/// GET query string.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
pub struct LikeRequest {
    #[serde(rename = "type")]
    pub kind: TargetKind,
    #[validate(range(min = 1))]
    pub id: i32,
}

impl LikeRequest {
    pub fn target(&self) -> LikeTarget {
        LikeTarget::new(self.kind, self.id)
    }
}
