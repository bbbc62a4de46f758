// Option grammar tests: canonical encoding, legacy tokens and query values

use imgroute::options::{parse_form_values, parse_legacy_options, FormValues};
use imgroute::{Options, OutputFormat};
use proptest::prelude::*;
use rstest::rstest;

fn full(quality: i32, crop: [f64; 4]) -> Options {
    Options {
        width: 1.0,
        height: 2.0,
        fit: true,
        rotate: 90,
        flip_vertical: true,
        flip_horizontal: true,
        quality,
        signature: "c0ffee".to_string(),
        format: Some(OutputFormat::Png),
        crop_x: crop[0],
        crop_y: crop[1],
        crop_width: crop[2],
        crop_height: crop[3],
        ..Default::default()
    }
}

#[rstest]
#[case(Options::default(), "0x0")]
#[case(
    Options { width: 1.0, height: 2.0, fit: true, rotate: 90, flip_vertical: true, flip_horizontal: true, quality: 80, ..Default::default() },
    "1x2,fit,r90,fv,fh,q80"
)]
#[case(
    Options { width: 0.15, height: 1.3, rotate: 45, quality: 95, signature: "c0ffee".into(), format: Some(OutputFormat::Png), ..Default::default() },
    "0.15x1.3,r45,q95,sc0ffee,png"
)]
#[case(
    Options { width: 0.15, height: 1.3, rotate: 45, quality: 95, signature: "c0ffee".into(), crop_x: 100.0, crop_y: 200.0, ..Default::default() },
    "0.15x1.3,r45,q95,sc0ffee,cx100,cy200"
)]
#[case(
    Options { scale_up: true, smart_crop: true, format: Some(OutputFormat::Tiff), ..Default::default() },
    "0x0,scaleUp,tiff,sc"
)]
fn test_canonical_encoding(#[case] options: Options, #[case] expected: &str) {
    assert_eq!(options.to_string(), expected);
}

#[rstest]
#[case("", Options::default())]
#[case("x", Options::default())]
#[case("r", Options::default())]
#[case("0", Options::default())]
#[case("crop=,,,,", Options::default())]
#[case("width=1", Options { width: 1.0, ..Default::default() })]
#[case("height=1", Options { height: 1.0, ..Default::default() })]
#[case("width=1&height=2", Options { width: 1.0, height: 2.0, fit: true, ..Default::default() })]
#[case("width=-1&height=-2", Options { width: -1.0, height: -2.0, ..Default::default() })]
#[case("width=0.1&height=0.2", Options { width: 0.1, height: 0.2, fit: true, ..Default::default() })]
#[case("size=1", Options { width: 1.0, height: 1.0, fit: true, ..Default::default() })]
#[case("size=0.1", Options { width: 0.1, height: 0.1, fit: true, ..Default::default() })]
#[case("mode=fit", Options { fit: true, ..Default::default() })]
#[case("mode=smartcrop", Options { smart_crop: true, ..Default::default() })]
#[case("rotate=90", Options { rotate: 90, ..Default::default() })]
#[case("flip=v", Options { flip_vertical: true, ..Default::default() })]
#[case("flip=h", Options { flip_horizontal: true, ..Default::default() })]
#[case("format=jpeg", Options { format: Some(OutputFormat::Jpeg), ..Default::default() })]
#[case("format=gif", Options::default())]
#[case("FOO=BAR&size=1&BAR=foo&rotate=90&BAZ=DAS", Options { width: 1.0, height: 1.0, fit: true, rotate: 90, ..Default::default() })]
#[case(
    "quality=70&width=1&height=2&mode=fit&rotate=90&flip=v&flip=h&signature=c0ffee&format=png",
    full(70, [0.0; 4])
)]
#[case(
    "rotate=90&flip=h&signature=c0ffee&format=png&quality=90&width=1&height=2&flip=v&mode=fit",
    full(90, [0.0; 4])
)]
#[case(
    "quality=70&width=1&height=2&mode=fit&crop=100,200,300,400&rotate=90&flip=v&flip=h&signature=c0ffee&format=png",
    full(70, [100.0, 200.0, 300.0, 400.0])
)]
#[case(
    "crop=100,200,0,400&rotate=90&quality=90&flip=h&signature=c0ffee&format=png&flip=v&mode=fit&width=1&height=2",
    full(90, [100.0, 200.0, 0.0, 400.0])
)]
fn test_parse_form_values(#[case] query: &str, #[case] expected: Options) {
    let form = FormValues::parse(query).unwrap();
    assert_eq!(parse_form_values(&form, &Options::default()), expected);
}

#[test]
fn test_width_and_height_win_over_size_regardless_of_order() {
    for query in ["size=10&width=20", "width=20&size=10"] {
        let form = FormValues::parse(query).unwrap();
        let options = parse_form_values(&form, &Options::default());
        assert_eq!(options.width, 20.0, "query {}", query);
        assert_eq!(options.height, 10.0, "query {}", query);
    }
}

#[test]
fn test_unrecognized_keys_leave_defaults_unchanged() {
    let defaults = Options {
        quality: 55,
        rotate: 270,
        ..Default::default()
    };
    let form = FormValues::parse("v=2&cache=no&w=100").unwrap();
    assert_eq!(parse_form_values(&form, &defaults), defaults);
}

#[test]
fn test_legacy_tokens() {
    let options = parse_legacy_options("100x200,fit,r90,fv,fh,q80,sc0ffee,png,cx10,cy20,cw30,ch40");
    assert_eq!(options.width, 100.0);
    assert_eq!(options.height, 200.0);
    assert!(options.fit);
    assert_eq!(options.rotate, 90);
    assert!(options.flip_vertical && options.flip_horizontal);
    assert_eq!(options.quality, 80);
    assert_eq!(options.signature, "c0ffee");
    assert_eq!(options.format, Some(OutputFormat::Png));
    assert_eq!(
        [options.crop_x, options.crop_y, options.crop_width, options.crop_height],
        [10.0, 20.0, 30.0, 40.0]
    );
    assert!(!options.smart_crop);
}

#[test]
fn test_legacy_smart_crop_and_scale_up_are_literals() {
    let options = parse_legacy_options("sc,scaleUp");
    assert!(options.smart_crop);
    assert!(options.scale_up);
    assert!(options.signature.is_empty());
}

// Signatures that collide with the grammar's own tokens or separator
#[rstest]
#[case("c", Options { smart_crop: true, ..Default::default() })]
#[case("caleUp", Options { scale_up: true, ..Default::default() })]
#[case("a,b", Options { signature: "a".into(), ..Default::default() })]
fn test_unencodable_signatures(#[case] signature: &str, #[case] reparsed: Options) {
    let options = Options {
        signature: signature.to_string(),
        ..Default::default()
    };
    assert_eq!(parse_legacy_options(&options.to_string()), reparsed);
}

fn arb_format() -> impl Strategy<Value = Option<OutputFormat>> {
    prop_oneof![
        Just(None),
        Just(Some(OutputFormat::Jpeg)),
        Just(Some(OutputFormat::Png)),
        Just(Some(OutputFormat::Tiff)),
    ]
}

fn arb_dimension() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), 0.01f64..1.0, (1u32..5000).prop_map(f64::from)]
}

fn arb_crop() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), -2000.0f64..2000.0]
}

prop_compose! {
    fn arb_options()(
        width in arb_dimension(),
        height in arb_dimension(),
        flags in any::<[bool; 5]>(),
        rotate in prop_oneof![Just(0), Just(90), Just(180), Just(270)],
        quality in 0i32..=100,
        // two or more chars, so the encoded token is never the literal `sc`
        signature in prop_oneof![Just(String::new()), "[a-f0-9]{2,16}"],
        format in arb_format(),
        crop in (arb_crop(), arb_crop(), arb_crop(), arb_crop())
    ) -> Options {
        Options {
            width,
            height,
            fit: flags[0],
            rotate,
            flip_vertical: flags[1],
            flip_horizontal: flags[2],
            quality,
            signature,
            scale_up: flags[3],
            format,
            crop_x: crop.0,
            crop_y: crop.1,
            crop_width: crop.2,
            crop_height: crop.3,
            smart_crop: flags[4],
        }
    }
}

proptest! {
    /// The canonical encoding parses back to the same options.
    #[test]
    fn canonical_encoding_reparses(options in arb_options()) {
        let encoded = options.to_string();
        prop_assert_eq!(parse_legacy_options(&encoded), options);
    }

    /// Legacy parsing is total: any token soup yields options, never a panic.
    #[test]
    fn legacy_parser_never_panics(input in "[a-zA-Z0-9.,x-]{0,64}") {
        let _ = parse_legacy_options(&input);
    }
}
