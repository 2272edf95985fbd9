use super::*;

fn chain_product(chain: &str) -> f64 {
    chain
        .split(',')
        .map(|part| {
            part.strip_prefix("atempo=")
                .expect("chain parts are atempo filters")
                .parse::<f64>()
                .expect("atempo values parse")
        })
        .product()
}

#[test]
fn atempo_inside_the_window_is_a_single_filter() {
    assert_eq!(atempo_chain(1.5), "atempo=1.5");
    assert_eq!(atempo_chain(0.5), "atempo=0.5");
    assert_eq!(atempo_chain(2.0), "atempo=2");
}

#[test]
fn atempo_outside_the_window_decomposes_with_matching_product() {
    for factor in [3.0, 5.0, 8.0, 0.25, 0.1] {
        let chain = atempo_chain(factor);
        assert!(chain.contains(','), "factor {factor} should chain: {chain}");
        let product = chain_product(&chain);
        assert!(
            (product - factor).abs() < 1e-9,
            "factor {factor} decomposed to {chain} (product {product})"
        );
        for part in chain.split(',') {
            let v: f64 = part.strip_prefix("atempo=").unwrap().parse().unwrap();
            assert!((0.5..=2.0).contains(&v), "sub-factor {v} out of window");
        }
    }
}

#[test]
fn atempo_nonpositive_factor_falls_back_to_identity() {
    assert_eq!(atempo_chain(0.0), "atempo=1");
    assert_eq!(atempo_chain(-2.0), "atempo=1");
}

#[test]
fn speed_graph_drives_both_streams() {
    let graph = speed_graph(2.0);
    assert!(graph.contains("[0:v]setpts=PTS/2[v]"));
    assert!(graph.contains("[0:a]atempo=2[a]"));
}

#[test]
fn overlay_graph_carries_the_opacity() {
    assert!(overlay_graph(0.5).contains("colorchannelmixer=aa=0.5"));
}

#[test]
fn sfx_graph_gains_before_mixing() {
    let graph = sfx_graph(1.25);
    assert!(graph.contains("volume=1.25"));
    assert!(graph.contains("amix=inputs=2:duration=first"));
}

#[test]
fn filter_invocations_end_with_the_output_path() {
    use std::path::Path;
    let input = Path::new("/in/a.mp4");
    let output = Path::new("/out/b.mp4");
    for args in [
        invert_args(input, output),
        mirror_args(input, output),
        reverse_args(input, output),
        speed_args(input, output, 1.5),
        chorus_args(input, output, 0.3),
        earrape_args(input, output, 18),
        pitch_args(input, output, 1.2),
        preview_args(input, output),
    ] {
        assert_eq!(args.last().map(|s| s.as_os_str()), Some(output.as_os_str()));
        assert!(args.contains(&"-y".into()));
    }
}

#[test]
fn invert_copies_audio_through() {
    let args = invert_args(std::path::Path::new("a"), std::path::Path::new("b"));
    let strings: Vec<String> = args
        .iter()
        .map(|s| s.to_string_lossy().into_owned())
        .collect();
    let vf = strings.iter().position(|s| s == "-vf").unwrap();
    assert_eq!(strings[vf + 1], "negate");
    assert!(strings.windows(2).any(|w| w[0] == "-c:a" && w[1] == "copy"));
}

#[test]
fn preview_encode_scales_down() {
    let args = preview_args(std::path::Path::new("a"), std::path::Path::new("b"));
    assert!(args.contains(&"scale=640:-2".into()));
    assert!(args.contains(&"veryfast".into()));
}
