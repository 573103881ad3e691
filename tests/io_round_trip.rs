//! Integration tests for the text formats: grid files, output records and
//! serialized run options.

use approx::assert_relative_eq;
use trigrid::prelude::*;

// =============================================================================
// GRID FILES
// =============================================================================

#[test]
fn grid_file_survives_disk_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.asc");

    let region = Region::new(10.0, 13.0, -2.0, 0.0).unwrap();
    let header = GridHeader::new(region, 1.0, 0.5, Registration::Pixel).unwrap();
    assert_eq!(header.size(), 12);
    let values: Vec<f32> = (0u16..12)
        .map(|i| if i % 5 == 0 { f32::NAN } else { f32::from(i) * 0.25 })
        .collect();
    let grid = Grid::from_data(header, values).unwrap();

    save_grid(&grid, &path).unwrap();
    let loaded = load_grid(&path).unwrap();

    assert_eq!(loaded.header(), grid.header());
    for (a, b) in loaded.data().iter().zip(grid.data()) {
        assert!(a == b || (a.is_nan() && b.is_nan()), "{a} != {b}");
    }
}

#[test]
fn grid_file_header_selects_registration() {
    let text = "ncols 2\nnrows 2\nxllcenter 0\nyllcenter 0\ncellsize 1\nNODATA_value -9999\n1 2\n3 -9999\n";
    let grid = read_grid("inline", text.as_bytes()).unwrap();

    assert_eq!(grid.header().registration(), Registration::Gridline);
    assert_eq!(grid.header().region(), Region::new(0.0, 1.0, 0.0, 1.0).unwrap());
    // First data row is the northern one
    assert_eq!(grid.value_at(0.0, 1.0), Some(1.0));
    assert_eq!(grid.value_at(0.0, 0.0), Some(3.0));
    assert!(grid.value_at(1.0, 0.0).unwrap().is_nan());

    let pixel = text.replace("center", "corner");
    let grid = read_grid("inline", pixel.as_bytes()).unwrap();
    assert_eq!(grid.header().registration(), Registration::Pixel);
    assert_eq!(grid.header().region(), Region::new(0.0, 2.0, 0.0, 2.0).unwrap());
}

// =============================================================================
// OUTPUT RECORDS
// =============================================================================

#[test]
fn polygon_vertices_read_back_as_points() {
    let mut points = PointStore::new(PointLayout::XYZ);
    for p in [[0.5, 0.0, 1.0], [2.0, 0.25, 2.0], [0.0, 1.5, 3.0], [2.0, 2.0, 4.0]] {
        points.push(&p).unwrap();
    }
    let triangles = vec![Triangle::new(0, 1, 2).unwrap(), Triangle::new(1, 3, 2).unwrap()];

    let mut writer = RecordWriter::new(Vec::new(), true);
    writer.write_polygons(&points, &triangles).unwrap();
    writer.flush().unwrap();
    let text = String::from_utf8(writer.into_inner()).unwrap();
    assert_eq!(text.matches("> Polygon").count(), 2);

    // Segment headers are skipped by the record reader
    let mut reader = PointReader::new(PointLayout::XYZ);
    assert_eq!(reader.read("polygons", text.as_bytes()).unwrap(), 6);
    let read = reader.finish();

    let expected = triangles.iter().flat_map(Triangle::vertices);
    for (i, vertex) in (0..).zip(expected) {
        assert_eq!(read.xy(i), points.xy(vertex));
        assert_relative_eq!(read.z(i).unwrap(), points.z(vertex).unwrap());
    }
}

#[test]
fn index_table_lists_vertices_per_line() {
    let triangles = [Triangle::new(4, 0, 7).unwrap(), Triangle::new(1, 2, 3).unwrap()];
    let mut writer = RecordWriter::new(Vec::new(), false);
    writer.write_index_table(&triangles).unwrap();
    let text = String::from_utf8(writer.into_inner()).unwrap();
    assert_eq!(text, "4\t0\t7\n1\t2\t3\n");
}

// =============================================================================
// SERIALIZED OPTIONS
// =============================================================================

#[test]
fn options_round_trip_through_json() {
    let options = TriangulateOptionsBuilder::default()
        .grid_output("dem.asc")
        .region(Region::new(0.0, 100.0, 0.0, 50.0).unwrap())
        .increment([1.0, 0.5])
        .registration(Registration::Pixel)
        .derivative(Axis::X)
        .empty_value(-1.0)
        .index_table(true)
        .build()
        .unwrap();

    let json = serde_json::to_string(&options).unwrap();
    let back: TriangulateOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(back, options);
    assert_eq!(back.plan().unwrap(), options.plan().unwrap());
}

#[test]
fn missing_json_fields_take_defaults() {
    let options: TriangulateOptions = serde_json::from_str(r#"{"edges": true}"#).unwrap();
    assert!(options.edges);
    assert!(!options.gridding());
    assert_eq!(options.plan().unwrap().records, Some(RecordOutput::Edges));
}

#[test]
fn voronoi_edges_serialize_as_coordinates() {
    let edge = VoronoiEdge {
        start: [0.0, 1.0],
        end: [2.5, -1.0],
    };
    let json = serde_json::to_string(&edge).unwrap();
    assert_eq!(json, r#"{"start":[0.0,1.0],"end":[2.5,-1.0]}"#);
}
