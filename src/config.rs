use anyhow::Result;
use serde::Deserialize;

/// How placeholders are chosen for floors and statuses the sheet does not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    Cycle,
    Random,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub sheet_url: String,
    pub floorplan_svg_url: String,
    pub building_svg_url: String,
    pub overlay_id_attribute: String,
    pub fetch_timeout_secs: u64,
    pub office_prefix: String,
    pub fallback: FallbackMode,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sheet_url: String::new(),
            floorplan_svg_url: String::new(),
            building_svg_url: String::new(),
            overlay_id_attribute: "id".to_string(),
            fetch_timeout_secs: 10,
            office_prefix: "ДП".to_string(),
            fallback: FallbackMode::Cycle,
            seed: None,
        }
    }
}

impl Settings {
    /// Defaults overlaid with `FLOORPLAN_*` environment variables (`.env` included).
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let d = Settings::default();
        let settings = config::Config::builder()
            .set_default("sheet_url", d.sheet_url)?
            .set_default("floorplan_svg_url", d.floorplan_svg_url)?
            .set_default("building_svg_url", d.building_svg_url)?
            .set_default("overlay_id_attribute", d.overlay_id_attribute)?
            .set_default("fetch_timeout_secs", d.fetch_timeout_secs)?
            .set_default("office_prefix", d.office_prefix)?
            .set_default("fallback", "cycle")?
            .add_source(config::Environment::with_prefix("FLOORPLAN").try_parsing(true))
            .build()?
            .try_deserialize::<Settings>()?;

        Ok(settings)
    }
}
