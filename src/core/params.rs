use serde::{Deserialize, Serialize};

use crate::core::processing::bitmask::BitMask;
use crate::core::processing::stats::ValueRange;
use crate::types::{BitmaskOp, ByteOrder, DataType, OutputFormat};

/// Display options for one sample grid; suitable for config files and presets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayParams {
    pub width: usize,
    pub height: usize,
    /// Declared type was unsigned and the samples are held one kind wider
    pub is_unsigned: bool,
    /// Fixed display window; None computes it from the data
    pub range: Option<ValueRange>,
    pub fill_values: Vec<f64>,
    /// Source is column-major; emit row-major display order
    pub transpose: bool,
    pub force_convert: bool,
    pub auto_contrast: bool,
    /// Clamp applied to samples before the gain/bias correction
    pub contrast_clamp: Option<ValueRange>,
    pub bitmask: Option<BitMask>,
    pub bitmask_op: BitmaskOp,
}

impl Default for DisplayParams {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            is_unsigned: false,
            range: None,
            fill_values: Vec::new(),
            transpose: false,
            force_convert: false,
            auto_contrast: false,
            contrast_clamp: None,
            bitmask: None,
            bitmask_op: BitmaskOp::And,
        }
    }
}

/// File-to-image conversion parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionParams {
    pub data_type: DataType,
    pub byte_order: ByteOrder,
    pub format: OutputFormat,
    pub display: DisplayParams,
}

impl Default for ConversionParams {
    fn default() -> Self {
        Self {
            data_type: DataType::U8,
            byte_order: ByteOrder::Little,
            format: OutputFormat::TIFF,
            display: DisplayParams::default(),
        }
    }
}

impl ConversionParams {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_round_trip_with_partial_fields() {
        let json = r#"{
            "data_type": "i16",
            "display": { "width": 4, "height": 3, "auto_contrast": true, "fill_values": [-9999.0] }
        }"#;
        let params = ConversionParams::from_json(json).unwrap();
        assert_eq!(params.data_type, DataType::I16);
        assert_eq!(params.byte_order, ByteOrder::Little);
        assert_eq!(params.display.width, 4);
        assert!(params.display.auto_contrast);
        assert_eq!(params.display.fill_values, vec![-9999.0]);
        assert_eq!(params.display.bitmask_op, BitmaskOp::And);

        let again = ConversionParams::from_json(&params.to_json().unwrap()).unwrap();
        assert_eq!(again, params);
    }

    #[test]
    fn test_malformed_preset_is_an_error() {
        assert!(matches!(
            ConversionParams::from_json("{ \"data_type\": 3 }"),
            Err(crate::Error::Json(_))
        ));
    }
}
