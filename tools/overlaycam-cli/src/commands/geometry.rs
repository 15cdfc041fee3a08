//! Print the overlay placement for a frame size.

use overlaycam_common::config::AppConfig;
use overlaycam_overlay_model::{css_style, OverlayTransform, PreviewLayout, ScaleBounds};

pub struct GeometryArgs {
    pub frame_width: u32,
    pub frame_height: u32,
    pub aspect: f64,
    pub zoom_in: u32,
    pub zoom_out: u32,
    pub viewport: Option<String>,
    pub json: bool,
}

pub fn run(config: &AppConfig, args: GeometryArgs) -> anyhow::Result<()> {
    if args.frame_width == 0 || args.frame_height == 0 {
        anyhow::bail!("Frame size must be non-zero");
    }

    let overlay = &config.overlay;
    let mut transform = OverlayTransform::new(
        overlay.initial_scale,
        ScaleBounds::new(overlay.min_scale, overlay.max_scale),
        overlay.base_width_fraction,
    );
    for _ in 0..args.zoom_in {
        transform = transform.increment(overlay.step);
    }
    for _ in 0..args.zoom_out {
        transform = transform.decrement(overlay.step);
    }

    let (fw, fh) = (args.frame_width as f64, args.frame_height as f64);
    let placement = transform.resolve_geometry(fw, fh, args.aspect);
    let pixels = placement.to_pixel_rect();

    let preview = match args.viewport.as_deref() {
        Some(text) => {
            let (vw, vh) = parse_viewport(text)?;
            let layout = PreviewLayout::cover(fw, fh, vw, vh)
                .ok_or_else(|| anyhow::anyhow!("Viewport must have a positive area"))?;
            Some((layout, layout.overlay_rect(&transform, args.aspect)))
        }
        None => None,
    };

    if args.json {
        let value = serde_json::json!({
            "scale": transform.scale(),
            "placement": placement,
            "pixel_rect": pixels,
            "exceeds_frame": placement.exceeds(fw, fh),
            "preview": preview.map(|(layout, rect)| serde_json::json!({
                "layout": layout,
                "overlay": rect,
                "style": css_style(&rect),
            })),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Frame:     {}x{}", args.frame_width, args.frame_height);
    println!(
        "Scale:     {:.2} (bounds {:.2}..={:.2})",
        transform.scale(),
        transform.bounds().min(),
        transform.bounds().max()
    );
    println!(
        "Placement: x={:.2} y={:.2} w={:.2} h={:.2}",
        placement.x, placement.y, placement.width, placement.height
    );
    println!(
        "Pixels:    {}x{} at ({}, {})",
        pixels.width, pixels.height, pixels.x, pixels.y
    );
    if placement.exceeds(fw, fh) {
        println!("Note:      overlay extends past the frame and will be clipped");
    }
    if let Some((layout, rect)) = preview {
        println!();
        println!(
            "Preview:   {}x{} viewport, frame scaled by {:.4}",
            layout.viewport_width, layout.viewport_height, layout.scale
        );
        println!("Style:     {}", css_style(&rect));
    }

    Ok(())
}

/// Parse `WIDTHxHEIGHT`.
fn parse_viewport(text: &str) -> anyhow::Result<(f64, f64)> {
    let (w, h) = text
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow::anyhow!("Viewport must look like 390x844, got {text:?}"))?;
    let w: f64 = w.trim().parse()?;
    let h: f64 = h.trim().parse()?;
    Ok((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_viewport() {
        assert_eq!(parse_viewport("390x844").unwrap(), (390.0, 844.0));
        assert_eq!(parse_viewport("1280 X 720").unwrap(), (1280.0, 720.0));
        assert!(parse_viewport("390").is_err());
        assert!(parse_viewport("wide x tall").is_err());
    }

    #[test]
    fn zero_frame_is_rejected() {
        let args = GeometryArgs {
            frame_width: 0,
            frame_height: 1080,
            aspect: 1.0,
            zoom_in: 0,
            zoom_out: 0,
            viewport: None,
            json: false,
        };
        assert!(run(&AppConfig::default(), args).is_err());
    }
}
