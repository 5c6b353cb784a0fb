use crate::types::FrameType;

/// The fixed columns every frame carries outside the open-ended parameter
/// table (§4.4 `Frame_Scans`/`Frame_Params` split).
#[derive(Debug, Clone, Copy)]
pub struct NewFrame {
    pub frame_num: i64,
    pub frame_type: FrameType,
    pub scans: u32,
}
