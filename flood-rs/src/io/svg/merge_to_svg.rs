use svg::Document;
use svg::node::element::{Circle, Group, Rectangle, Text, Title};

use crate::classify::DepthGrade;
use crate::geometry::primitives::{Point, Rect};
use crate::io::svg::svg_util;
use crate::io::svg::svg_util::{MapFrame, SvgDrawOptions};
use crate::merging::sampling::circle_outline;
use crate::merging::{BufferCircle, MergeResult, OutlineKind};

/// Renders the merged outlines (and optionally the sensors and their buffer circles) as a north-up map.
///
/// `depths[i]` is the water depth at the sensor of `circles[i]`, it determines the color of the sensor dot.
/// Missing entries are drawn with the theme's sensor color.
pub fn merge_result_to_svg(
    result: &MergeResult,
    circles: &[BufferCircle],
    depths: &[Option<f64>],
    options: SvgDrawOptions,
    title: &str,
) -> Document {
    let theme = &options.theme;

    let lonlat_points = result
        .groups
        .iter()
        .flat_map(|g| g.outline.vertices.iter().copied())
        .chain(circles.iter().map(|c| c.center.lonlat()));

    let Some(lonlat_bbox) = Rect::bounding(lonlat_points) else {
        return Document::new()
            .set("viewBox", (0, 0, 1, 1))
            .add(Title::new(format!("no flood outlines | {title}")));
    };
    let frame = MapFrame::centered_on(&lonlat_bbox);

    let bbox = {
        let projected = result
            .groups
            .iter()
            .flat_map(|g| g.outline.vertices.iter().map(|&p| frame.project(p)))
            .chain(circles.iter().flat_map(|c| {
                let Point(x, y) = frame.project(c.center.lonlat());
                [Point(x - c.radius, y - c.radius), Point(x + c.radius, y + c.radius)]
            }));
        //lonlat_bbox is not empty, neither is this one
        Rect::bounding(projected).unwrap_or(lonlat_bbox)
    };
    let vbox = bbox.scale(1.10);
    let min_dim = f64::min(bbox.width(), bbox.height()).max(1.0) as f32;
    let stroke_width = min_dim * 0.001 * theme.stroke_width_multiplier;
    let font_size = min_dim * 0.025;

    let label = {
        let label_content = format!(
            "groups: {} | merged: {} | circles: {} | edges: {} | {}",
            result.groups.len(),
            result.groups.iter().filter(|g| g.members.len() > 1).count(),
            result.n_circles,
            result.n_edges,
            title,
        );
        Text::new(label_content)
            .set("x", bbox.x_min as f32)
            .set("y", bbox.y_min as f32 - 0.5 * font_size)
            .set("font-size", font_size)
            .set("font-family", "monospace")
            .set("font-weight", "500")
    };

    let background = Rectangle::new()
        .set("x", vbox.x_min as f32)
        .set("y", vbox.y_min as f32)
        .set("width", vbox.width() as f32)
        .set("height", vbox.height() as f32)
        .set("fill", format!("{}", theme.background_fill));

    let circles_group = {
        let mut circles_group = Group::new().set("id", "buffer_circles");
        if options.buffer_circles {
            for (i, c) in circles.iter().enumerate() {
                let ring = circle_outline(c, 64).into_iter().map(|p| frame.project(p));
                circles_group = circles_group.add(
                    svg_util::data_to_path(
                        svg_util::ring_data(ring),
                        &[
                            ("fill", "none"),
                            ("stroke", &*format!("{}", theme.buffer_stroke)),
                            ("stroke-width", &*format!("{}", 0.5 * stroke_width)),
                            ("stroke-opacity", "0.5"),
                            ("stroke-dasharray", &*format!("{}", 3.0 * stroke_width)),
                        ],
                    )
                    .add(Title::new(format!("circle {i}, radius: {:.1} m", c.radius))),
                );
            }
        }
        circles_group
    };

    let outlines_group = {
        let mut outlines_group = Group::new().set("id", "flood_outlines");
        for (g_idx, group) in result.groups.iter().enumerate() {
            let fill = match group.kind {
                OutlineKind::Hull => theme.hull_fill,
                OutlineKind::Circle => theme.circle_fill,
            };
            let ring = group.outline.vertices.iter().map(|&p| frame.project(p));
            outlines_group = outlines_group.add(
                svg_util::data_to_path(
                    svg_util::ring_data(ring),
                    &[
                        ("fill", &*format!("{fill}")),
                        ("fill-opacity", &*format!("{}", theme.fill_opacity)),
                        ("stroke", &*format!("{}", svg_util::change_brightness(fill, 0.5))),
                        ("stroke-width", &*format!("{stroke_width}")),
                        ("stroke-linejoin", "round"),
                    ],
                )
                .add(Title::new(format!(
                    "group {g_idx}, members: {:?}, height: {:.2} m",
                    group.members, group.height
                ))),
            );
        }
        outlines_group
    };

    let sensors_group = {
        let mut sensors_group = Group::new().set("id", "sensors");
        if options.sensors {
            for (i, c) in circles.iter().enumerate() {
                let depth = depths.get(i).copied().flatten();
                let color = depth
                    .and_then(DepthGrade::from_depth)
                    .map_or(theme.sensor_fill, |g| g.color());
                let title = match depth {
                    Some(d) => format!("sensor {i}, depth: {d:.3} m"),
                    None => format!("sensor {i}"),
                };
                sensors_group = sensors_group.add(
                    svg_util::point(
                        frame.project(c.center.lonlat()),
                        Some(&*format!("{color}")),
                        Some(3.0 * stroke_width),
                    )
                    .add(Title::new(title)),
                );
            }
        }
        sensors_group
    };

    let legend_group = {
        let mut legend_group = Group::new().set("id", "legend");
        if options.legend {
            let y = bbox.y_max as f32 + 1.5 * font_size;
            let spacing = bbox.width() as f32 / DepthGrade::ALL.len() as f32;
            for (k, grade) in DepthGrade::ALL.iter().enumerate() {
                let x = bbox.x_min as f32 + k as f32 * spacing;
                legend_group = legend_group
                    .add(
                        Circle::new()
                            .set("cx", x + 0.5 * font_size)
                            .set("cy", y - 0.35 * font_size)
                            .set("r", 0.4 * font_size)
                            .set("fill", format!("{}", grade.color())),
                    )
                    .add(
                        Text::new(grade.label())
                            .set("x", x + 1.5 * font_size)
                            .set("y", y)
                            .set("font-size", font_size)
                            .set("font-family", "monospace"),
                    );
            }
        }
        legend_group
    };

    let (x, y, w, h) = (
        vbox.x_min as f32,
        vbox.y_min as f32,
        vbox.width() as f32,
        vbox.height() as f32,
    );

    Document::new()
        .set("viewBox", (x, y, w, h))
        .set("xmlns:xlink", "http://www.w3.org/1999/xlink")
        .add(background)
        .add(circles_group)
        .add(outlines_group)
        .add(sensors_group)
        .add(legend_group)
        .add(label)
}
