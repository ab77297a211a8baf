// Copyright 2025 Lars Brubaker
// Shared edges, touching vertices and collinear overlaps.

mod helpers;

use edgescan::{ChainFlags, FillMode, ScanConfig};
use helpers::{assert_area_approx, pts, rect, reference_area, scan_one, verify_valid_output};

#[test]
fn squares_sharing_an_edge() {
    let figs = [rect(0.0, 0.0, 10.0, 10.0), rect(10.0, 0.0, 20.0, 10.0)];
    for mode in [FillMode::Alternate, FillMode::Winding] {
        let s = scan_one(&figs, mode, ScanConfig::default());
        verify_valid_output(&s);
        assert_area_approx(s.filled_area(), 200.0, 1e-9, "shared edge");
        // The shared edge runs both ways and drops out.
        assert!(s.chains().any(|c| c.flags().contains(ChainFlags::CANCELLED)));
        assert!(s.chains().any(|c| c.flags().contains(ChainFlags::COINCIDENT)));
    }
}

#[test]
fn partial_shared_edge() {
    let figs = [rect(0.0, 0.0, 10.0, 10.0), rect(10.0, 3.0, 20.0, 7.0)];
    let s = scan_one(&figs, FillMode::Winding, ScanConfig::default());
    verify_valid_output(&s);
    assert_area_approx(s.filled_area(), 140.0, 1e-9, "T-junction");
}

#[test]
fn squares_touching_at_a_corner() {
    let figs = [rect(0.0, 0.0, 10.0, 10.0), rect(10.0, 10.0, 20.0, 20.0)];
    let s = scan_one(&figs, FillMode::Alternate, ScanConfig::default());
    verify_valid_output(&s);
    assert_area_approx(s.filled_area(), 200.0, 1e-9, "corner touch");
    assert_eq!(s.intersections().count(), 0);
}

#[test]
fn vertex_on_another_edge() {
    // Triangle apex sits on the square's top edge.
    let figs = [
        rect(0.0, 0.0, 10.0, 10.0),
        pts(&[(2.0, 14.0), (8.0, 14.0), (5.0, 10.0)]),
    ];
    let s = scan_one(&figs, FillMode::Winding, ScanConfig::default());
    verify_valid_output(&s);
    assert_area_approx(s.filled_area(), 112.0, 1e-9, "apex on edge");
}

#[test]
fn overlapping_collinear_edges() {
    // Both rectangles share the line y = 0 over x in [5, 10].
    let figs = [rect(0.0, 0.0, 10.0, 4.0), rect(5.0, -4.0, 15.0, 0.0)];
    let s = scan_one(&figs, FillMode::Winding, ScanConfig::default());
    verify_valid_output(&s);
    assert_area_approx(s.filled_area(), 80.0, 1e-9, "collinear overlap");
}

#[test]
fn identical_figures_stack_winding() {
    let tri = pts(&[(0.0, 0.0), (10.0, 0.0), (5.0, 10.0)]);
    let figs = [tri.clone(), tri.clone(), tri];
    let s = scan_one(&figs, FillMode::Winding, ScanConfig::default());
    verify_valid_output(&s);
    assert_area_approx(s.filled_area(), 50.0, 1e-9, "triple");
    let max = s.chains().map(|c| c.winding()[0].abs()).max();
    assert_eq!(max, Some(3));
    // Two of each three coincident chains are marked.
    let coincident = s
        .chains()
        .filter(|c| c.flags().contains(ChainFlags::COINCIDENT))
        .count();
    assert_eq!(coincident * 3, s.chains().count() * 2);
}

#[test]
fn many_edges_through_one_point() {
    // Four triangles meeting at the origin.
    let figs = [
        pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]),
        pts(&[(0.0, 0.0), (0.0, 10.0), (-10.0, 10.0)]),
        pts(&[(0.0, 0.0), (-10.0, 0.0), (-10.0, -10.0)]),
        pts(&[(0.0, 0.0), (0.0, -10.0), (10.0, -10.0)]),
    ];
    let s = scan_one(&figs, FillMode::Alternate, ScanConfig::default());
    verify_valid_output(&s);
    assert_area_approx(s.filled_area(), 200.0, 1e-9, "fan");
}

#[test]
fn edge_crossing_through_a_vertex() {
    // The diagonal of the second figure passes exactly through (5, 5).
    let figs = [
        pts(&[(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)]),
        pts(&[(0.0, 10.0), (10.0, 0.0), (10.0, 10.0)]),
    ];
    let s = scan_one(&figs, FillMode::Winding, ScanConfig::default());
    verify_valid_output(&s);
    assert_area_approx(s.filled_area(), 75.0, 1e-9, "through vertex");
}

#[test]
fn duplicate_triangle_crossed_by_a_square() {
    let tri = pts(&[(-3.0, -2.0), (13.0, 1.0), (4.0, 14.0)]);
    let square = rect(0.0, 0.0, 10.0, 10.0);
    let config = ScanConfig::default().with_resolution(4096.0);
    let single = scan_one(&[tri.clone(), square.clone()], FillMode::Winding, config.clone());
    let doubled = scan_one(&[tri.clone(), tri.clone(), square.clone()], FillMode::Winding, config.clone());
    verify_valid_output(&doubled);
    let expected = reference_area(&[tri.clone(), square.clone()], FillMode::Winding);
    assert_area_approx(single.filled_area(), expected, 0.05, "single triangle");
    assert_area_approx(doubled.filled_area(), single.filled_area(), 1e-6, "doubled triangle");

    // Both copies cancel under alternate, leaving the square.
    let s = scan_one(&[tri.clone(), tri, square], FillMode::Alternate, config);
    verify_valid_output(&s);
    assert_area_approx(s.filled_area(), 100.0, 0.05, "doubled triangle, alternate");
}

#[test]
fn zero_width_spike_across_an_edge() {
    // (-10, -16) is visited twice, so the edge to (23, 20) runs out and back.
    let spike = pts(&[(23.0, 20.0), (-10.0, -16.0), (8.0, -2.0), (-16.0, 0.0), (-10.0, -16.0)]);
    for resolution in [256.0, 4096.0] {
        for mode in [FillMode::Alternate, FillMode::Winding] {
            let config = ScanConfig::default().with_resolution(resolution);
            let s = scan_one(&[spike.clone()], mode, config);
            verify_valid_output(&s);
            assert_area_approx(s.filled_area(), 186.0, 0.05, "spike");
            assert_area_approx(reference_area(&[spike.clone()], mode), 186.0, 1e-9, "spike reference");
        }
    }
}
