//! Text sprites: a text path along a one-unit rail, plus measurement.

use std::fmt;

use super::dom::VmlDocument;
use super::path::zoomed;
use super::state::RenderState;
use crate::log::debug;
use crate::surface::config::{DEFAULT_FONT_SIZE, TEXT_HEIGHT_PADDING};
use crate::surface::{SpriteAttrs, TextAnchor};

/// Font attributes of a text sprite, borrowed for measurement
#[derive(Clone, Copy, Debug, Default)]
pub struct FontSpec<'a> {
    /// CSS `font` shorthand
    pub font: Option<&'a str>,
    pub family: Option<&'a str>,
    pub size: Option<&'a str>,
    pub weight: Option<&'a str>,
    pub style: Option<&'a str>,
}

impl<'a> FontSpec<'a> {
    pub fn from_attrs(attrs: &'a SpriteAttrs) -> Self {
        FontSpec {
            font: attrs.font.as_deref(),
            family: attrs.font_family.as_deref(),
            size: attrs.font_size.as_deref(),
            weight: attrs.font_weight.as_deref(),
            style: attrs.font_style.as_deref(),
        }
    }

    /// Font size in pixels.
    ///
    /// An explicit size wins over the shorthand. Points are converted at 96 dpi.
    pub fn size_px(&self) -> f64 {
        self.size
            .and_then(|s| parse_length(s, true))
            .or_else(|| {
                self.font?
                    .split_whitespace()
                    .find_map(|token| parse_length(token, false))
            })
            .unwrap_or(DEFAULT_FONT_SIZE)
    }
}

/// Parse a CSS length. Shorthand tokens must carry a unit so that numeric
/// weights such as `700` are not taken for sizes.
fn parse_length(token: &str, bare_ok: bool) -> Option<f64> {
    // `12px/1.5` carries a line height
    let token = token.split('/').next()?.trim();
    let (number, scale) = if let Some(n) = token.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = token.strip_suffix("pt") {
        (n, 4.0 / 3.0)
    } else if let Some(n) = token.strip_suffix("em") {
        (n, DEFAULT_FONT_SIZE)
    } else if bare_ok {
        (token, 1.0)
    } else {
        return None;
    };
    let value: f64 = number.parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value * scale)
}

/// Measures rendered text in pixels
pub trait TextMeasurer: fmt::Debug {
    /// Width and height of `text`, which may span several lines
    fn measure(&self, text: &str, font: &FontSpec<'_>) -> (f64, f64);
}

/// Proportional character widths in hundredths of an average character,
/// indexed from `' '`.
#[rustfmt::skip]
const CHAR_WIDTHS: [u8; 95] = [
    45,  55,  62, 115,  90, 132, 125,  40,
    55,  55,  71, 115,  45,  48,  45,  50,
    91,  91,  91,  91,  91,  91,  91,  91,
    91,  91,  50,  50, 120, 120, 120,  78,
   142, 102, 105, 110, 115, 105,  98, 105,
   125,  58,  58, 107,  95, 145, 125, 115,
    95, 115, 107,  95,  97, 118, 102, 150,
   100,  93, 100,  58,  50,  58, 119,  72,
    72,  86,  92,  80,  92,  85,  52,  92,
    92,  47,  47,  88,  48, 135,  92,  86,
    92,  92,  69,  75,  58,  92,  80, 121,
    81,  80,  76,  91,  49,  91, 118,
];

/// Average character width as a fraction of the font size
const AVERAGE_CHAR_WIDTH: f64 = 0.08 / 0.14;

const LINE_HEIGHT: f64 = 1.2;

/// Headless measurer using a fixed proportional width table
#[derive(Clone, Copy, Debug, Default)]
pub struct ProportionalMeasurer;

impl ProportionalMeasurer {
    fn line_units(line: &str) -> u32 {
        line.chars()
            .map(|c| match c {
                ' '..='~' => u32::from(CHAR_WIDTHS[c as usize - 0x20]),
                _ => 100,
            })
            .sum()
    }
}

impl TextMeasurer for ProportionalMeasurer {
    fn measure(&self, text: &str, font: &FontSpec<'_>) -> (f64, f64) {
        let px = font.size_px();
        let lines: Vec<&str> = text.split('\n').collect();
        let units = lines.iter().map(|l| Self::line_units(l)).max().unwrap_or(0);
        let width = f64::from(units) * 0.01 * AVERAGE_CHAR_WIDTH * px;
        let height = lines.len() as f64 * px * LINE_HEIGHT;
        (width, height)
    }
}

/// Decode the HTML entities text attributes may carry
pub fn html_decode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        let decoded = rest.find(';').and_then(|end| {
            let entity = &rest[1..end];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" | "#39" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                    .and_then(char::from_u32),
            };
            c.map(|c| (c, end))
        });
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// First family of a comma-separated list, without quotes
fn first_family(families: &str) -> &str {
    families
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
}

/// Round half up, as the layout engine reports sizes
fn round_px(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Update a text sprite's text path and rail.
///
/// Font, string and measurement are only refreshed when `font_changed`; the
/// rail follows `x`/`y` on every pass.
pub(crate) fn set_text_attributes(
    doc: &mut VmlDocument,
    state: &mut RenderState,
    attrs: &SpriteAttrs,
    font_changed: bool,
    measurer: &dyn TextMeasurer,
) {
    let (Some(rail), Some(textpath)) = (state.handles.path, state.handles.textpath) else {
        return;
    };

    if font_changed {
        let family = attrs
            .font_family
            .as_deref()
            .map(|f| format!("\"{}\"", first_family(f)));
        for (prop, value) in [
            ("font", attrs.font.clone()),
            ("font-family", family),
            ("font-size", attrs.font_size.clone()),
            ("font-weight", attrs.font_weight.clone()),
            ("font-style", attrs.font_style.clone()),
        ] {
            // An empty value drops a style left over from an earlier pass
            doc.set_style(textpath, prop, value.unwrap_or_default());
        }

        let text = html_decode(attrs.text.as_deref().unwrap_or_default());
        let (width, height) = measurer.measure(&text, &FontSpec::from_attrs(attrs));
        doc.set_attr(textpath, "string", text);

        let metrics = &mut state.metrics;
        metrics.width = round_px(width);
        metrics.height = round_px(height) + TEXT_HEIGHT_PADDING;
        let (align, bbx) = match attrs.text_anchor.unwrap_or_default() {
            TextAnchor::Middle => ("center", 0.0),
            TextAnchor::End => ("right", -round_px(metrics.width / 2.0)),
            TextAnchor::Start => ("left", round_px(metrics.width / 2.0)),
        };
        metrics.bbx = bbx;
        doc.set_style(textpath, "v-text-align", align);
        debug!(width = metrics.width, height = metrics.height, "measured text");
    }

    let metrics = &mut state.metrics;
    metrics.x = attrs.x.unwrap_or(0.0);
    metrics.y = attrs.y.unwrap_or(0.0);
    let (x, y) = (zoomed(metrics.x), zoomed(metrics.y));
    doc.set_attr(rail, "v", format!("m{},{}l{},{}", x, y, x + 1, y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vml::dom::Tag;

    #[test]
    fn font_size_sources() {
        let spec = FontSpec {
            font: Some("bold 700 12px/1.5 Arial"),
            ..Default::default()
        };
        assert_eq!(spec.size_px(), 12.0);
        let spec = FontSpec {
            font: Some("12px Arial"),
            size: Some("16px"),
            ..Default::default()
        };
        assert_eq!(spec.size_px(), 16.0);
        let spec = FontSpec {
            font: Some("italic 9pt serif"),
            ..Default::default()
        };
        assert!((spec.size_px() - 12.0).abs() < 1e-9);
        let spec = FontSpec {
            size: Some("18"),
            ..Default::default()
        };
        assert_eq!(spec.size_px(), 18.0);
        assert_eq!(FontSpec::default().size_px(), DEFAULT_FONT_SIZE);
    }

    #[test]
    fn proportional_widths() {
        let m = ProportionalMeasurer;
        let font = FontSpec {
            size: Some("14px"),
            ..Default::default()
        };
        // 'H' is 125 units: 1.25 * 0.08/0.14 * 14
        let (w, h) = m.measure("H", &font);
        assert!((w - 10.0).abs() < 1e-9);
        assert!((h - 16.8).abs() < 1e-9);

        let (w2, h2) = m.measure("H\nHH", &font);
        assert!((w2 - 20.0).abs() < 1e-9);
        assert!((h2 - 33.6).abs() < 1e-9);
    }

    #[test]
    fn entities() {
        assert_eq!(html_decode("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(html_decode("&#65;&#x42;&quot;"), "AB\"");
        assert_eq!(html_decode("fish & chips &bogus;"), "fish & chips &bogus;");
    }

    #[test]
    fn families() {
        assert_eq!(first_family("'Helvetica Neue', Arial"), "Helvetica Neue");
        assert_eq!(first_family("Arial"), "Arial");
    }

    #[derive(Debug)]
    struct Fixed;

    impl TextMeasurer for Fixed {
        fn measure(&self, _: &str, _: &FontSpec<'_>) -> (f64, f64) {
            (41.0, 12.0)
        }
    }

    fn text_state(doc: &mut VmlDocument) -> RenderState {
        let element = doc.create(Tag::Shape);
        let mut state = RenderState::new(element);
        state.handles.textpath = Some(doc.create(Tag::TextPath));
        state.handles.path = Some(doc.create(Tag::Path));
        state
    }

    #[test]
    fn anchors_shift_the_box() {
        let mut doc = VmlDocument::new();
        let mut state = text_state(&mut doc);
        let mut attrs = SpriteAttrs {
            x: Some(10.0),
            y: Some(20.0),
            text: Some("hi".into()),
            font_family: Some("'Verdana', sans-serif".into()),
            ..Default::default()
        };
        set_text_attributes(&mut doc, &mut state, &attrs, true, &Fixed);
        let textpath = state.handles.textpath.unwrap();
        assert_eq!(doc.style(textpath, "v-text-align"), Some("left"));
        assert_eq!(doc.style(textpath, "font-family"), Some("\"Verdana\""));
        assert_eq!(doc.attr(textpath, "string"), Some("hi"));
        // round(41 / 2) = 21
        assert_eq!(state.metrics.bbx, 21.0);
        assert_eq!(state.metrics.height, 14.0);
        assert_eq!(
            doc.attr(state.handles.path.unwrap(), "v"),
            Some("m216000,432000l216001,432000")
        );

        attrs.text_anchor = Some(TextAnchor::End);
        set_text_attributes(&mut doc, &mut state, &attrs, true, &Fixed);
        assert_eq!(state.metrics.bbx, -21.0);
        assert_eq!(doc.style(textpath, "v-text-align"), Some("right"));

        attrs.text_anchor = Some(TextAnchor::Middle);
        set_text_attributes(&mut doc, &mut state, &attrs, true, &Fixed);
        assert_eq!(state.metrics.bbx, 0.0);
        assert_eq!(doc.style(textpath, "v-text-align"), Some("center"));
    }

    #[test]
    fn removed_font_attributes_clear_their_style() {
        let mut doc = VmlDocument::new();
        let mut state = text_state(&mut doc);
        let mut attrs = SpriteAttrs {
            text: Some("hi".into()),
            font_size: Some("12px".into()),
            font_weight: Some("bold".into()),
            font_family: Some("Arial".into()),
            ..Default::default()
        };
        set_text_attributes(&mut doc, &mut state, &attrs, true, &Fixed);
        let textpath = state.handles.textpath.unwrap();
        assert_eq!(doc.style(textpath, "font-weight"), Some("bold"));

        attrs.font_weight = None;
        attrs.font_family = None;
        set_text_attributes(&mut doc, &mut state, &attrs, true, &Fixed);
        assert_eq!(doc.style(textpath, "font-weight"), None);
        assert_eq!(doc.style(textpath, "font-family"), None);
        assert_eq!(doc.style(textpath, "font-size"), Some("12px"));
    }

    #[test]
    fn position_updates_without_font_change() {
        let mut doc = VmlDocument::new();
        let mut state = text_state(&mut doc);
        let attrs = SpriteAttrs {
            x: Some(1.0),
            y: Some(1.0),
            text: Some("hi".into()),
            ..Default::default()
        };
        set_text_attributes(&mut doc, &mut state, &attrs, false, &Fixed);
        assert_eq!(state.metrics.width, 0.0);
        assert_eq!(state.metrics.x, 1.0);
        assert_eq!(doc.attr(state.handles.textpath.unwrap(), "string"), None);
    }
}
