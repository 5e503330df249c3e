use std::{collections::BTreeMap, fmt};

use clap::Args;

use crate::choice::Shape;

/// Keys of the option table, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptKey {
    /// Frame rate of the input image sequence, not a filter option
    InputFps,
    Fps,
    MiMode,
    McMode,
    Vsbmc,
    Me,
    MbSize,
}

impl OptKey {
    /// Name of the option as `minterpolate` (or the prompt) knows it.
    pub fn name(self) -> &'static str {
        match self {
            OptKey::InputFps => "input_fps",
            OptKey::Fps => "fps",
            OptKey::MiMode => "mi_mode",
            OptKey::McMode => "mc_mode",
            OptKey::Vsbmc => "vsbmc",
            OptKey::Me => "me",
            OptKey::MbSize => "mb_size",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptValue {
    Str(String),
    Int(i64),
    Float(f64),
}

impl OptValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptValue::Int(v) => Some(*v as f64),
            OptValue::Float(v) => Some(*v),
            OptValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for OptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptValue::Str(s) => f.write_str(s),
            OptValue::Int(v) => write!(f, "{v}"),
            OptValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Interpolation mode (`mi_mode`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpMode {
    Blend,
    Mci,
}

impl InterpMode {
    pub const MODE_OPTS_BLEND: &'static [OptKey] = &[OptKey::Fps, OptKey::MiMode];
    pub const MODE_OPTS_MCI: &'static [OptKey] = &[
        OptKey::Fps,
        OptKey::MiMode,
        OptKey::McMode,
        OptKey::Vsbmc,
        OptKey::Me,
        OptKey::MbSize,
    ];

    pub fn from_name(name: &str) -> Option<InterpMode> {
        match name {
            "blend" => Some(InterpMode::Blend),
            "mci" => Some(InterpMode::Mci),
            _ => None,
        }
    }

    /// Option keys `minterpolate` gets in this mode.
    pub fn relevant_keys(self) -> &'static [OptKey] {
        match self {
            InterpMode::Blend => Self::MODE_OPTS_BLEND,
            InterpMode::Mci => Self::MODE_OPTS_MCI,
        }
    }
}

/// Options collected for one run. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionTable {
    values: BTreeMap<OptKey, OptValue>,
}

impl OptionTable {
    pub fn builder() -> OptionTableBuilder {
        OptionTableBuilder::default()
    }

    pub fn get(&self, key: OptKey) -> Option<&OptValue> {
        self.values.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (OptKey, &OptValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    /// Selected interpolation mode, if `mi_mode` holds a known mode.
    pub fn mode(&self) -> Option<InterpMode> {
        self.get(OptKey::MiMode)
            .and_then(OptValue::as_str)
            .and_then(InterpMode::from_name)
    }

    /// Project the options relevant to `mode` into `minterpolate` arguments.
    ///
    /// Keys outside the mode's set are dropped even when present.
    pub fn filter_args(&self, mode: InterpMode) -> Vec<(&'static str, String)> {
        let keys = mode.relevant_keys();
        self.iter()
            .filter(|(k, _)| keys.contains(k))
            .map(|(k, v)| (k.name(), v.to_string()))
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct OptionTableBuilder {
    values: BTreeMap<OptKey, OptValue>,
}

impl OptionTableBuilder {
    pub fn set(&mut self, key: OptKey, value: OptValue) -> &mut Self {
        self.values.insert(key, value);
        self
    }

    pub fn build(self) -> OptionTable {
        OptionTable {
            values: self.values,
        }
    }
}

pub const DEFAULT_INPUT_FPS: f64 = 15.0;

/// A prompted option: accepted shape and fallback value.
#[derive(Debug, Clone, PartialEq)]
pub struct OptSpec {
    pub key: OptKey,
    pub shape: Shape,
    pub default: OptValue,
}

/// Shapes and defaults of every prompted option.
#[derive(Debug, Clone, PartialEq)]
pub struct Defaults {
    pub input_fps: OptSpec,
    pub fps: OptSpec,
    pub mi_mode: OptSpec,
    /// Only prompted for `mi_mode=mci`
    pub mci: Vec<OptSpec>,
}

impl Default for Defaults {
    fn default() -> Self {
        let spec = |key: OptKey, shape: Shape, default: OptValue| OptSpec {
            key,
            shape,
            default,
        };
        Defaults {
            input_fps: spec(
                OptKey::InputFps,
                Shape::FloatRange(0.1, 144.0),
                OptValue::Float(DEFAULT_INPUT_FPS),
            ),
            fps: spec(OptKey::Fps, Shape::IntRange(1, 144), OptValue::Int(60)),
            mi_mode: spec(
                OptKey::MiMode,
                Shape::OneOf(&["blend", "mci"]),
                OptValue::Str("mci".into()),
            ),
            mci: vec![
                spec(
                    OptKey::McMode,
                    Shape::OneOf(&["aobmc", "obmc"]),
                    OptValue::Str("aobmc".into()),
                ),
                spec(
                    OptKey::Vsbmc,
                    Shape::OneOf(&["0", "1"]),
                    OptValue::Str("1".into()),
                ),
                spec(
                    OptKey::Me,
                    Shape::OneOf(&[
                        "ds", "epzs", "esa", "fss", "hexbs", "ntss", "tdls", "tss", "umh",
                    ]),
                    OptValue::Str("epzs".into()),
                ),
                spec(OptKey::MbSize, Shape::IntRange(1, 512), OptValue::Int(16)),
            ],
        }
    }
}

/// Overlay text is drawn as-is unless asked otherwise
pub const DEFAULT_TEXT_EXPANSION: &str = "none";

/// `drawtext` overlay parameters. Nothing is drawn without `text`.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct TextOverlay {
    /// overlay text
    #[arg(long)]
    pub text: Option<String>,
    /// text expansion: 'none' draws the text literally, 'normal' expands
    /// `%{...}` sequences [default: none]
    #[arg(long = "text-expansion", value_parser = ["none", "normal", "strftime"])]
    pub expansion: Option<String>,
    /// x position of the text box (ffmpeg expression)
    #[arg(long = "text-x")]
    pub x: Option<String>,
    /// y position of the text box (ffmpeg expression)
    #[arg(long = "text-y")]
    pub y: Option<String>,
    /// font family (fontconfig), e.g. 'Sans'
    #[arg(long)]
    pub font: Option<String>,
    #[arg(long)]
    pub font_file: Option<String>,
    #[arg(long)]
    pub font_size: Option<u32>,
    /// includes opacity (e.g. 'white@0.8')
    #[arg(long)]
    pub font_color: Option<String>,
    /// draw a box behind the text
    #[arg(long = "box")]
    pub box_enabled: bool,
    #[arg(long)]
    pub box_color: Option<String>,
    /// padding around the text, in pixels
    #[arg(long = "box-border")]
    pub box_border_width: Option<u32>,
    #[arg(long)]
    pub shadow_color: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub shadow_x: Option<i32>,
    #[arg(long, allow_hyphen_values = true)]
    pub shadow_y: Option<i32>,
}

impl TextOverlay {
    /// `drawtext` arguments, `None` if there is no text to draw.
    pub fn filter_args(&self) -> Option<Vec<(&'static str, String)>> {
        let text = self.text.as_ref()?;
        let expansion = self.expansion.as_deref().unwrap_or(DEFAULT_TEXT_EXPANSION);
        let mut args = vec![
            ("text", text.to_string()),
            ("expansion", expansion.to_string()),
        ];
        let mut push = |name: &'static str, value: Option<String>| {
            if let Some(v) = value {
                args.push((name, v));
            }
        };
        push("x", self.x.clone());
        push("y", self.y.clone());
        push("font", self.font.clone());
        push("fontfile", self.font_file.clone());
        push("fontsize", self.font_size.map(|v| v.to_string()));
        push("fontcolor", self.font_color.clone());
        push("box", self.box_enabled.then(|| "1".to_string()));
        push("boxcolor", self.box_color.clone());
        push("boxborderw", self.box_border_width.map(|v| v.to_string()));
        push("shadowcolor", self.shadow_color.clone());
        push("shadowx", self.shadow_x.map(|v| v.to_string()));
        push("shadowy", self.shadow_y.map(|v| v.to_string()));
        Some(args)
    }
}
