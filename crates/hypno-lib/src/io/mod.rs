pub mod csv;
pub mod json;

pub use self::csv::{load_series_csv, save_series_csv, write_series_csv};
pub use self::json::{load_series, load_series_json, series_to_json};
