use crate::config::AppConfigOverrides;
use anyhow::{anyhow, bail, Context, Result};
use std::env;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliOverrides {
    manifest: Option<String>,
    ticks: Option<u64>,
    fps: Option<f32>,
}

impl CliOverrides {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(env::args())
    }

    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = CliOverrides::default();
        let mut iter = args.into_iter();
        let _ = iter.next(); // skip program name if present
        while let Some(raw_flag) = iter.next() {
            let flag = raw_flag.as_ref();
            if !flag.starts_with("--") {
                bail!("Unexpected argument '{flag}'. Use --manifest/--ticks/--fps with values.");
            }
            let key = &flag[2..];
            let value =
                iter.next().ok_or_else(|| anyhow!("Expected a value after '{flag}'"))?.as_ref().to_string();
            match key {
                "manifest" => {
                    overrides.manifest = Some(value);
                }
                "ticks" => {
                    overrides.ticks =
                        Some(value.parse::<u64>().with_context(|| format!("Invalid tick count '{value}'"))?);
                }
                "fps" => {
                    let fps =
                        value.parse::<f32>().with_context(|| format!("Invalid fps '{value}'"))?;
                    if !fps.is_finite() || fps <= 0.0 {
                        bail!("Invalid fps '{value}'. Expected a positive number.");
                    }
                    overrides.fps = Some(fps);
                }
                _ => bail!("Unknown flag '{flag}'. Supported flags: --manifest, --ticks, --fps."),
            }
        }
        Ok(overrides)
    }

    pub fn into_config_overrides(self) -> AppConfigOverrides {
        AppConfigOverrides { manifest: self.manifest, ticks: self.ticks, fps: self.fps }
    }

    #[cfg(test)]
    pub fn as_tuple(&self) -> (Option<&str>, Option<u64>, Option<f32>) {
        (self.manifest.as_deref(), self.ticks, self.fps)
    }
}
