//! Integration tests for the CAD import pipeline: file-based import,
//! conversion into a document, and failure semantics.

use std::io::Write;

use floorkit_layout::{
    apply_transform, convert_to_components, summarize_inventory, CadImporter, ConversionConfig,
    ConversionRule, FileFormat, ImportError, ItemType, LayoutDocument, LayoutItem, Point,
};

const FLOOR_PLAN_SVG: &str = r#"<svg viewBox="0 0 1000 600">
    <g id="walls">
        <rect id="wall-n" x="0" y="0" width="1000" height="20"/>
        <rect id="wall-s" x="0" y="580" width="1000" height="20"/>
        <line id="partition-1" x1="500" y1="20" x2="500" y2="580"/>
    </g>
    <g id="doors">
        <rect id="door-main" x="480" y="0" width="40" height="20"/>
    </g>
    <g id="equipment">
        <rect id="machine-press" x="100" y="100" width="120" height="60"/>
        <circle id="machine-lathe" cx="300" cy="200" r="40"/>
    </g>
    <g id="dimensions">
        <line x1="0" y1="590" x2="1000" y2="590"/>
    </g>
</svg>"#;

#[test]
fn test_import_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("floor-plan.svg");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(FLOOR_PLAN_SVG.as_bytes()).unwrap();

    let importer = CadImporter::new();
    let result = importer.import_file(&path).unwrap();
    assert_eq!(result.format, FileFormat::Svg);
    assert_eq!(result.elements.len(), 7);
    assert_eq!(result.dimensions, (1000.0, 600.0));

    let names: Vec<_> = result.layers.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["walls", "doors", "equipment", "dimensions"]);

    // Bounds from element extents, not the viewBox.
    assert_eq!(result.bounds.x, 0.0);
    assert_eq!(result.bounds.width, 1000.0);
    assert_eq!(result.bounds.bottom(), 600.0);
}

#[test]
fn test_scenario_wall_rect_bounds() {
    let importer = CadImporter::new();
    let result = importer
        .import_svg(
            r#"<svg viewBox="0 0 1000 600">
                <rect id="wall-1" x="10" y="10" width="200" height="20"/>
            </svg>"#,
        )
        .unwrap();
    assert_eq!(result.layers.len(), 1);
    assert_eq!(result.layers[0].name, "walls");
    assert_eq!(result.bounds.x, 10.0);
    assert_eq!(result.bounds.y, 10.0);
    assert_eq!(result.bounds.width, 200.0);
    assert_eq!(result.bounds.height, 20.0);
}

#[test]
fn test_convert_append_and_summarize() {
    let importer = CadImporter::new();
    let result = importer.import_svg(FLOOR_PLAN_SVG).unwrap();

    // Equipment becomes racks in this warehouse; dimensions stay
    // unmapped and drop out.
    let config = ConversionConfig::default().with_rule(
        "equipment",
        ConversionRule::with_transform(ItemType::HorizontalRack, |item, element| {
            item.name = element.id.clone();
        }),
    );
    let mut components = convert_to_components(&result, &config);
    assert_eq!(components.len(), 6);
    assert!(components.iter().all(|c| c.imported));

    // Halve the drawing into the document's coordinate space.
    apply_transform(&mut components, 0.5, Point::new(40.0, 40.0));

    let mut doc = LayoutDocument::new("imported");
    doc.items.push(LayoutItem::boundary("fp", 0.0, 0.0, 800.0, 500.0));
    doc.append(components);
    assert_eq!(doc.items.len(), 7);

    let report = summarize_inventory(&doc.items);
    let racks: Vec<_> = report
        .iter()
        .filter(|s| s.item_type == ItemType::HorizontalRack)
        .collect();
    assert_eq!(racks.len(), 2);
    assert!(racks.iter().any(|s| s.title == "machine-press"));
}

#[test]
fn test_unsupported_and_unimplemented_formats() {
    let importer = CadImporter::new();

    let err = importer
        .import_file(std::path::Path::new("plan.jpeg"))
        .unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat { extension } if extension == "jpeg"));

    // Recognized formats are read before the missing parser is
    // reported, so the file has to exist.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.dwg");
    std::fs::write(&path, b"AC1027").unwrap();
    let err = importer.import_file(&path).unwrap_err();
    assert!(matches!(err, ImportError::NotImplemented { .. }));
}

#[test]
fn test_read_failure_surfaces() {
    let importer = CadImporter::new();
    let err = importer
        .import_file(std::path::Path::new("/nonexistent/dir/plan.svg"))
        .unwrap_err();
    assert!(matches!(err, ImportError::Read { .. }));
}

#[test]
fn test_parse_failure_returns_no_partial_result() {
    let importer = CadImporter::new();
    let err = importer
        .import_svg("<svg><rect x=\"1\"")
        .unwrap_err();
    assert!(matches!(err, ImportError::Parse { .. }));
}
