use serde::{Deserialize, Serialize};

/// Browser viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
	pub width: u32,
	pub height: u32,
}

impl Viewport {
	pub fn new(width: u32, height: u32) -> Self {
		Self { width, height }
	}
}

impl std::fmt::Display for Viewport {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}x{}", self.width, self.height)
	}
}

/// Browser engine family used for render-grid entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserFamily {
	/// Chromium-based browser (Chrome, Edge)
	#[default]
	Chromium,
	/// Mozilla Firefox
	Firefox,
	/// WebKit (Safari)
	Webkit,
}

impl std::fmt::Display for BrowserFamily {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			BrowserFamily::Chromium => write!(f, "chromium"),
			BrowserFamily::Firefox => write!(f, "firefox"),
			BrowserFamily::Webkit => write!(f, "webkit"),
		}
	}
}

/// Emulated mobile device used for render-grid entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceName {
	Pixel2,
	Pixel5,
	Nexus10,
	IphoneX,
}

impl std::fmt::Display for DeviceName {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			DeviceName::Pixel2 => write!(f, "Pixel 2"),
			DeviceName::Pixel5 => write!(f, "Pixel 5"),
			DeviceName::Nexus10 => write!(f, "Nexus 10"),
			DeviceName::IphoneX => write!(f, "iPhone X"),
		}
	}
}

/// Screen orientation for emulated devices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenOrientation {
	#[default]
	Portrait,
	Landscape,
}

/// One entry of the cross-browser render matrix.
///
/// The backend renders every checkpoint once per target; a suite run with a
/// five-entry matrix produces five comparisons per checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RenderTarget {
	/// Desktop browser at a fixed viewport.
	Desktop { viewport: Viewport, browser: BrowserFamily },
	/// Emulated mobile device.
	Device {
		name: DeviceName,
		orientation: ScreenOrientation,
	},
}

impl RenderTarget {
	/// Desktop entry shorthand.
	pub fn desktop(width: u32, height: u32, browser: BrowserFamily) -> Self {
		Self::Desktop {
			viewport: Viewport::new(width, height),
			browser,
		}
	}

	/// Device-emulation entry shorthand.
	pub fn device(name: DeviceName, orientation: ScreenOrientation) -> Self {
		Self::Device { name, orientation }
	}
}

impl std::fmt::Display for RenderTarget {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			RenderTarget::Desktop { viewport, browser } => write!(f, "{browser} {viewport}"),
			RenderTarget::Device { name, orientation } => write!(f, "{name} ({orientation:?})"),
		}
	}
}
