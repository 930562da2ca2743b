use serde::{Deserialize, Serialize};

use crate::error::{TicklineError, TicklineResult};
use crate::interaction::ScrollEffect;
use crate::render::{LabelRasterizer, Renderer};

use super::{Tickline, TicklineConfig};

pub const TICKLINE_CONFIG_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicklineConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: TicklineConfig,
}

impl TicklineConfig {
    pub fn to_json_contract_v1_pretty(&self) -> TicklineResult<String> {
        let payload = TicklineConfigJsonContractV1 {
            schema_version: TICKLINE_CONFIG_JSON_SCHEMA_V1,
            config: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            TicklineError::InvalidData(format!("failed to serialize config contract v1: {e}"))
        })
    }

    /// Accepts either a bare config or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> TicklineResult<Self> {
        if let Ok(config) = serde_json::from_str::<TicklineConfig>(input) {
            return Ok(config);
        }
        let payload: TicklineConfigJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            TicklineError::InvalidData(format!("failed to parse config json payload: {e}"))
        })?;
        if payload.schema_version != TICKLINE_CONFIG_JSON_SCHEMA_V1 {
            return Err(TicklineError::InvalidData(format!(
                "unsupported config schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.config)
    }
}

impl<R, E> Tickline<R, E>
where
    R: Renderer + LabelRasterizer,
    E: ScrollEffect,
{
    /// Config that would rebuild this tickline in its current state.
    #[must_use]
    pub fn current_config(&self) -> TicklineConfig {
        let finite = |value: f64| value.is_finite().then_some(value);
        TicklineConfig {
            bounds: self.view.bounds(),
            orientation: self.view.orientation(),
            backward: self.view.backward(),
            index_0: self.view.index_0(),
            index_1: self.view.index_1(),
            min_index: finite(self.view.min_index()),
            max_index: finite(self.view.max_index()),
            scale_min: self.scale_min,
            scale_max: self.scale_max,
            zoomable: self.zoomable,
            translation_touches: self.translation_touches,
            drag_threshold: self.drag_threshold,
            line_offset: self.view.line_offset(),
            draw_line: self.draw_line,
            line_width: self.line_width,
            line_color: self.line_color,
            background_color: self.background_color,
            label_padding: self.label_padding,
            center_duration: self.center_duration,
            grids: self.grids.iter().map(|(_, grid)| grid.clone()).collect(),
        }
    }

    pub fn config_json_contract_v1_pretty(&self) -> TicklineResult<String> {
        self.current_config().to_json_contract_v1_pretty()
    }
}
