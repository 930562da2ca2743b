use thiserror::Error;

pub type TicklineResult<T> = Result<T, TicklineError>;

#[derive(Debug, Error)]
pub enum TicklineError {
    #[error("value {value} is outside the selectable range [{min}, {max}]")]
    ValueRange { value: i64, min: i64, max: i64 },

    #[error("invalid geometry: width={width}, height={height}")]
    InvalidGeometry { width: f64, height: f64 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
