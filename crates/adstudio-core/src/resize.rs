//! Adaptive resize: retarget a whole document to a new canvas size while
//! keeping its visual hierarchy.
//!
//! Every layer is scaled uniformly by `min(newW / oldW, newH / oldH)` so no
//! layer distorts, then repositioned by a policy chosen from its class:
//!
//! | class              | placement                                        |
//! |--------------------|--------------------------------------------------|
//! | background/overlay | full bleed                                       |
//! | cta                | centered horizontally, around 3/4 of the height  |
//! | text               | relative center, pulled up on taller targets     |
//! | product            | relative center, up on taller, down on wider     |
//! | logo               | 5% top-left margin, at most 15% of the width     |
//! | other              | proportional top-left                            |
//!
//! Layers with importance of at least [`IMPORTANT_THRESHOLD`] keep a minimum
//! size, and every result is clamped into the canvas and rounded to whole
//! units. The function is pure and deterministic.

use crate::document::{AdDocument, SafeArea};
use crate::layers::{ImageKind, Layer, LayerRole, MIN_LAYER_SIZE};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Smallest font size a resize may produce.
pub const FONT_SIZE_MIN: f64 = 14.0;
/// Largest font size a resize may produce.
pub const FONT_SIZE_MAX: f64 = 120.0;
/// Importance at which the minimum-size floor applies.
pub const IMPORTANT_THRESHOLD: u8 = 70;
/// Minimum long side of important layers, as a fraction of the shorter
/// canvas side.
pub const MIN_SIZE_FRACTION: f64 = 0.2;

/// How the resize engine treats a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerClass {
    Cta,
    Text,
    Product,
    Logo,
    Overlay,
    Background,
    Other,
}

impl LayerClass {
    /// Classify a layer. An explicit role wins over the variant.
    pub fn of(layer: &Layer) -> Self {
        if let Some(role) = layer.base().role {
            return match role {
                LayerRole::Background => LayerClass::Background,
                LayerRole::Overlay => LayerClass::Overlay,
                LayerRole::Cta => LayerClass::Cta,
                LayerRole::Headline | LayerRole::Body => LayerClass::Text,
                LayerRole::Product => LayerClass::Product,
                LayerRole::Logo => LayerClass::Logo,
                LayerRole::Decoration => LayerClass::Other,
            };
        }
        match layer {
            Layer::Text(_) => LayerClass::Text,
            Layer::Cta(_) => LayerClass::Cta,
            Layer::Image(image) => match image.image_kind {
                ImageKind::Background => LayerClass::Background,
                ImageKind::Product => LayerClass::Product,
                ImageKind::Overlay => LayerClass::Overlay,
                ImageKind::Logo => LayerClass::Logo,
                ImageKind::Image => LayerClass::Other,
            },
            Layer::Shape(_) | Layer::Group(_) => LayerClass::Other,
        }
    }

    /// Fixed importance weight. Only used for the minimum-size floor and
    /// quality checks, never for paint order.
    pub fn importance(self) -> u8 {
        match self {
            LayerClass::Cta => 100,
            LayerClass::Text => 80,
            LayerClass::Product => 70,
            LayerClass::Logo => 60,
            LayerClass::Other => 50,
            LayerClass::Overlay => 20,
            LayerClass::Background => 10,
        }
    }

    pub fn is_important(self) -> bool {
        self.importance() >= IMPORTANT_THRESHOLD
    }
}

/// A named target format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FormatPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub width: f64,
    pub height: f64,
    pub platform: &'static str,
}

impl FormatPreset {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Built-in social and web formats.
pub const FORMAT_PRESETS: [FormatPreset; 9] = [
    FormatPreset { id: "square", name: "Square", width: 1080.0, height: 1080.0, platform: "Instagram Post" },
    FormatPreset { id: "story", name: "Story", width: 1080.0, height: 1920.0, platform: "Instagram/TikTok Story" },
    FormatPreset { id: "landscape", name: "Landscape", width: 1920.0, height: 1080.0, platform: "Facebook/YouTube" },
    FormatPreset { id: "portrait", name: "Portrait", width: 1080.0, height: 1350.0, platform: "Instagram Portrait" },
    FormatPreset { id: "twitter", name: "Twitter", width: 1200.0, height: 675.0, platform: "Twitter/X Post" },
    FormatPreset { id: "linkedin", name: "LinkedIn", width: 1200.0, height: 627.0, platform: "LinkedIn Post" },
    FormatPreset { id: "banner", name: "Banner", width: 728.0, height: 90.0, platform: "Web Banner" },
    FormatPreset { id: "leaderboard", name: "Leaderboard", width: 970.0, height: 250.0, platform: "Web Leaderboard" },
    FormatPreset { id: "pinterest", name: "Pinterest", width: 1000.0, height: 1500.0, platform: "Pinterest Pin" },
];

/// Look up a preset by ID.
pub fn find_preset(id: &str) -> Option<&'static FormatPreset> {
    FORMAT_PRESETS.iter().find(|p| p.id == id)
}

/// Scale factors shared by every layer of one resize.
#[derive(Debug, Clone, Copy)]
struct Retarget {
    old: Size,
    new: Size,
    uniform: f64,
    /// Old size unusable for relative placement.
    degenerate: bool,
    taller: bool,
    wider: bool,
}

impl Retarget {
    fn new(old: Size, new: Size) -> Self {
        let degenerate = !(old.width > 0.0 && old.height > 0.0 && old.width.is_finite() && old.height.is_finite());
        if degenerate {
            return Self {
                old,
                new,
                uniform: 1.0,
                degenerate,
                taller: false,
                wider: false,
            };
        }
        let old_ratio = old.width / old.height;
        let new_ratio = new.width / new.height;
        Self {
            old,
            new,
            uniform: (new.width / old.width).min(new.height / old.height),
            degenerate,
            taller: new_ratio < old_ratio,
            wider: new_ratio > old_ratio,
        }
    }

    /// New top-left for a box of `(w, h)` whose old center sat at
    /// `(cx, cy)`, with a vertical bias.
    fn relative_center(&self, cx: f64, cy: f64, w: f64, h: f64, y_bias: f64) -> (f64, f64) {
        if self.degenerate {
            return (0.0, 0.0);
        }
        let rel_x = cx / self.old.width;
        let rel_y = cy / self.old.height;
        (self.new.width * rel_x - w / 2.0, self.new.height * rel_y * y_bias - h / 2.0)
    }

    fn layer(&self, layer: &Layer) -> Layer {
        let class = LayerClass::of(layer);
        let base = layer.base();
        let aspect = if base.width > 0.0 { base.height / base.width } else { 1.0 };
        let (new_w, new_h) = (self.new.width, self.new.height);

        let mut width = base.width * self.uniform;
        let mut height = base.height * self.uniform;
        if class.is_important() {
            let floor = new_w.min(new_h) * MIN_SIZE_FRACTION;
            if base.width >= base.height {
                if width < floor {
                    width = floor;
                    height = floor * aspect;
                }
            } else if height < floor {
                height = floor;
                width = if aspect > 0.0 { floor / aspect } else { floor };
            }
        }

        let center_x = base.x + base.width / 2.0;
        let center_y = base.y + base.height / 2.0;
        let (x, y) = match class {
            LayerClass::Background | LayerClass::Overlay => {
                width = new_w;
                height = new_h;
                (0.0, 0.0)
            }
            LayerClass::Cta => ((new_w - width) / 2.0, new_h * 0.75 - height / 2.0),
            LayerClass::Text => {
                let bias = if self.taller { 0.9 } else { 1.0 };
                self.relative_center(center_x, center_y, width, height, bias)
            }
            LayerClass::Product => {
                let bias = if self.taller {
                    0.7
                } else if self.wider {
                    1.1
                } else {
                    1.0
                };
                self.relative_center(center_x, center_y, width, height, bias)
            }
            LayerClass::Logo => {
                width = width.min(new_w * 0.15);
                height = width * aspect;
                (new_w * 0.05, new_h * 0.05)
            }
            LayerClass::Other if self.degenerate => (0.0, 0.0),
            LayerClass::Other => (new_w * base.x / self.old.width, new_h * base.y / self.old.height),
        };

        // Shrink, keeping proportions, anything the floor pushed past the canvas.
        let overflow = (new_w / width).min(new_h / height);
        if overflow < 1.0 {
            width *= overflow;
            height *= overflow;
        }

        let width = width.round().clamp(MIN_LAYER_SIZE, new_w);
        let height = height.round().clamp(MIN_LAYER_SIZE, new_h);
        let x = x.round().clamp(0.0, (new_w - width).max(0.0));
        let y = y.round().clamp(0.0, (new_h - height).max(0.0));

        let (fx, fy) = (width / base.width.max(f64::MIN_POSITIVE), height / base.height.max(f64::MIN_POSITIVE));
        let mut out = match layer {
            Layer::Group(_) => layer.resized(fx, fy),
            other => other.clone(),
        };
        let out_base = out.base_mut();
        out_base.x = x;
        out_base.y = y;
        out_base.width = width;
        out_base.height = height;

        if let Some(size) = layer.font_size() {
            out.set_font_size(clamp_font((size * self.uniform).round()));
        }
        if let Layer::Group(group) = &mut out {
            group.children.iter_mut().for_each(clamp_descendant_fonts);
        }
        out
    }
}

fn clamp_font(size: f64) -> f64 {
    size.clamp(FONT_SIZE_MIN, FONT_SIZE_MAX)
}

fn clamp_descendant_fonts(layer: &mut Layer) {
    if let Some(size) = layer.font_size() {
        layer.set_font_size(clamp_font(size.round()));
    }
    if let Layer::Group(group) = layer {
        group.children.iter_mut().for_each(clamp_descendant_fonts);
    }
}

/// Retarget `doc` to a canvas of `target` size.
///
/// Resizing to the current size returns the layers unchanged. The result
/// carries a [`SafeArea::proportional`] for the new canvas and lists layers
/// in their original paint order.
pub fn resize(doc: &AdDocument, target: Size) -> AdDocument {
    let new = Size::new(target.width.max(MIN_LAYER_SIZE), target.height.max(MIN_LAYER_SIZE));
    let mut out = doc.clone();
    out.width = new.width;
    out.height = new.height;
    out.safe_area = Some(SafeArea::proportional(new.width, new.height));
    if new == doc.size() {
        return out;
    }

    let retarget = Retarget::new(doc.size(), new);
    out.layers = doc.layers.iter().map(|layer| retarget.layer(layer)).collect();
    out.layers.sort_by_key(Layer::z_index);
    log::debug!(
        "Resized {} layers from {}x{} to {}x{} (scale {:.3})",
        out.layers.len(),
        doc.width,
        doc.height,
        new.width,
        new.height,
        retarget.uniform
    );
    out
}

/// Retarget `doc` to a preset format.
pub fn resize_to_preset(doc: &AdDocument, preset: &FormatPreset) -> AdDocument {
    resize(doc, preset.size())
}

/// One resized document per built-in preset, in preset order.
pub fn generate_all_formats(doc: &AdDocument) -> Vec<(&'static FormatPreset, AdDocument)> {
    FORMAT_PRESETS
        .iter()
        .map(|preset| (preset, resize_to_preset(doc, preset)))
        .collect()
}

/// Heuristic quality report for a resized document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeQuality {
    /// 0 to 100.
    pub score: u32,
    pub issues: Vec<String>,
}

/// Area share under which an important layer counts as too small.
pub const MIN_IMPORTANT_AREA_RATIO: f64 = 0.02;

/// Score a resized document: important layers covering under 2% of the
/// canvas cost 10 points each, a CTA reaching past 95% of the height costs 20.
pub fn assess_resize_quality(resized: &AdDocument) -> ResizeQuality {
    let mut score: i32 = 100;
    let mut issues = Vec::new();
    let canvas_area = resized.width * resized.height;

    for layer in &resized.layers {
        if !LayerClass::of(layer).is_important() {
            continue;
        }
        let base = layer.base();
        if canvas_area > 0.0 && base.width * base.height / canvas_area < MIN_IMPORTANT_AREA_RATIO {
            issues.push(format!("{} may be too small", base.name));
            score -= 10;
        }
    }

    if let Some(cta) = resized.layers.iter().find(|l| LayerClass::of(l) == LayerClass::Cta) {
        let base = cta.base();
        if base.y + base.height > resized.height * 0.95 {
            issues.push("CTA may be cut off".to_string());
            score -= 20;
        }
    }

    ResizeQuality {
        score: score.max(0) as u32,
        issues,
    }
}
