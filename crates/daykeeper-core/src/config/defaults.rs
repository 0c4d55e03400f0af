//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "Daykeeper".to_string()
}

pub fn default_data_dir() -> String {
    "~/.daykeeper".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_language() -> String {
    "Russian".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_sweep_interval() -> u64 {
    60
}

pub fn default_first_sweep_delay() -> u64 {
    5
}

pub fn default_reset_time() -> String {
    "23:55".to_string()
}

pub fn default_api_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_api_port() -> u16 {
    8000
}

pub fn default_reading_dir() -> String {
    "pdfs".to_string()
}

pub fn default_reading_extension() -> String {
    "pdf".to_string()
}
