use trajplot::{
    Canvas, CpuRenderer, Fps, InMemorySink, RenderStyle, Trajectory, export,
};

fn renderer() -> CpuRenderer {
    CpuRenderer::new(
        Canvas {
            width: 64,
            height: 64,
        },
        RenderStyle::default(),
        None,
    )
    .unwrap()
}

#[test]
fn frames_change_as_the_trail_grows() {
    let csv = "time,x,y\n0,0,0\n1,30,0\n2,30,30\n";
    let traj = Trajectory::from_csv_reader(csv.as_bytes(), None).unwrap();
    let mut sink = InMemorySink::new();
    export(&traj, &mut renderer(), Fps::new(10, 1).unwrap(), &mut sink).unwrap();

    let frames = sink.frames();
    assert_eq!(frames.len(), 3);
    // The marker moves and the viewport refits, so consecutive frames differ.
    assert_ne!(frames[0].1.data, frames[1].1.data);
    assert_ne!(frames[1].1.data, frames[2].1.data);
}

#[test]
fn marker_color_is_present() {
    let csv = "time,x,y\n0,0,0\n";
    let traj = Trajectory::from_csv_reader(csv.as_bytes(), None).unwrap();
    let mut sink = InMemorySink::new();
    export(&traj, &mut renderer(), Fps::new(10, 1).unwrap(), &mut sink).unwrap();

    let frame = &sink.frames()[0].1;
    // Marker fill is strongly red; the dark background and grey grid are not.
    let reddish = frame
        .data
        .chunks_exact(4)
        .filter(|px| px[0] > 150 && px[1] < 100 && px[2] < 100)
        .count();
    assert!(reddish > 10, "expected marker pixels, found {reddish}");
}

#[test]
fn repeated_export_is_bit_identical() {
    let csv = "time,x,y\n0,0,0\n1,5,9\n";
    let traj = Trajectory::from_csv_reader(csv.as_bytes(), None).unwrap();
    let fps = Fps::new(10, 1).unwrap();

    let mut a = InMemorySink::new();
    export(&traj, &mut renderer(), fps, &mut a).unwrap();
    let mut b = InMemorySink::new();
    export(&traj, &mut renderer(), fps, &mut b).unwrap();

    for ((_, fa), (_, fb)) in a.frames().iter().zip(b.frames()) {
        assert_eq!(fa.data, fb.data);
    }
}
