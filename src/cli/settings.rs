//! Settings command implementation

use anyhow::Result;
use clap::{Args, ValueEnum};

use super::utils::resolve_config;
use super::GlobalArgs;
use crate::config::CliOverrides;
use crate::session::{LineSpacing, ReaderState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SpacingArg {
    Compact,
    Normal,
    Relaxed,
}

impl From<SpacingArg> for LineSpacing {
    fn from(arg: SpacingArg) -> Self {
        match arg {
            SpacingArg::Compact => LineSpacing::Compact,
            SpacingArg::Normal => LineSpacing::Normal,
            SpacingArg::Relaxed => LineSpacing::Relaxed,
        }
    }
}

#[derive(Args)]
pub struct SettingsArgs {
    /// Change the font scale by this many percent (rounded to steps of 10)
    #[arg(long, value_name = "PERCENT", allow_hyphen_values = true)]
    pub font: Option<i32>,

    /// Line spacing for chapter text
    #[arg(long, value_enum)]
    pub line_spacing: Option<SpacingArg>,

    /// Switch between the light and dark theme
    #[arg(long)]
    pub toggle_theme: bool,

    /// Collapse (true) or expand (false) the chapter sidebar
    #[arg(long, value_name = "BOOL")]
    pub sidebar_collapsed: Option<bool>,
}

impl SettingsArgs {
    fn changes_anything(&self) -> bool {
        self.font.is_some()
            || self.line_spacing.is_some()
            || self.toggle_theme
            || self.sidebar_collapsed.is_some()
    }
}

/// Show reader preferences, applying any requested changes first.
pub fn run(global: &GlobalArgs, args: SettingsArgs) -> Result<()> {
    let config = resolve_config(global, CliOverrides::default())?;
    let mut state = ReaderState::load(&config.state_file)?;

    if args.changes_anything() {
        if let Some(delta) = args.font {
            state.adjust_font_scale(delta);
        }
        if let Some(spacing) = args.line_spacing {
            state.line_spacing = spacing.into();
        }
        if args.toggle_theme {
            state.toggle_theme();
        }
        if let Some(collapsed) = args.sidebar_collapsed {
            state.sidebar_collapsed = collapsed;
        }
        state.save(&config.state_file)?;
    }

    println!("Font scale: {}%", state.font_scale);
    println!("Line spacing: {}", state.line_spacing.as_str());
    println!("Theme: {}", state.theme.as_str());
    println!(
        "Sidebar: {}",
        if state.sidebar_collapsed { "collapsed" } else { "expanded" }
    );
    Ok(())
}
