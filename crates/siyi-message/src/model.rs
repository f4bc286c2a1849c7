use serde::Serialize;

/// Camera/gimbal product, identified by the model id in the hardware-id response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CameraModel {
    Zr10,
    A8Mini,
    A2Mini,
    Zr30,
    Zt30,
    Unknown,
}

impl CameraModel {
    /// Look up a model id. Ids outside the table map to `Unknown`.
    pub fn from_model_id(model_id: u16) -> Self {
        match model_id {
            0x6B => CameraModel::Zr10,
            0x73 => CameraModel::A8Mini,
            0x75 => CameraModel::A2Mini,
            0x78 => CameraModel::Zr30,
            0x7A => CameraModel::Zt30,
            _ => CameraModel::Unknown,
        }
    }

    /// Product name as printed on the device.
    pub fn name(self) -> &'static str {
        match self {
            CameraModel::Zr10 => "ZR10",
            CameraModel::A8Mini => "A8Mini",
            CameraModel::A2Mini => "A2Mini",
            CameraModel::Zr30 => "ZR30",
            CameraModel::Zt30 => "ZT30",
            CameraModel::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for CameraModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zr30_model_id() {
        assert_eq!(CameraModel::from_model_id(0x0078), CameraModel::Zr30);
        assert_eq!(CameraModel::Zr30.to_string(), "ZR30");
    }

    #[test]
    fn known_table() {
        assert_eq!(CameraModel::from_model_id(0x6B), CameraModel::Zr10);
        assert_eq!(CameraModel::from_model_id(0x73), CameraModel::A8Mini);
        assert_eq!(CameraModel::from_model_id(0x75), CameraModel::A2Mini);
        assert_eq!(CameraModel::from_model_id(0x7A), CameraModel::Zt30);
    }

    #[test]
    fn unlisted_ids_are_unknown() {
        for id in [0x0000, 0x0079, 0x7800, 0xFFFF] {
            assert_eq!(CameraModel::from_model_id(id), CameraModel::Unknown);
        }
        assert_eq!(CameraModel::Unknown.name(), "Unknown");
    }
}
