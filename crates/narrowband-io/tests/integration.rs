//! Integration tests for narrowband-io.

use narrowband_core::{AdcConfig, Capture, CaptureSource, Tone, ToneSource};
use narrowband_io::{Axis, Error, FileKind, read_data, read_header, read_record, write_adc, write_fft};
use proptest::prelude::*;
use tempfile::tempdir;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Any integer capture survives a write/read cycle exactly.
    #[test]
    fn adc_roundtrip(
        num_channels in 1usize..=16,
        num_samples in 1usize..200,
        bits in 2u32..=24,
        seed in any::<u64>(),
    ) {
        let half = 1i64 << (bits - 1);
        let mut state = seed | 1;
        let channels: Vec<Vec<i32>> = (0..num_channels)
            .map(|_| {
                (0..num_samples)
                    .map(|_| {
                        state ^= state << 13;
                        state ^= state >> 7;
                        state ^= state << 17;
                        ((state % (2 * half as u64)) as i64 - half) as i32
                    })
                    .collect()
            })
            .collect();
        let capture = Capture::new(channels).unwrap();
        let config = AdcConfig { bits, num_channels, ..Default::default() };

        let dir = tempdir().unwrap();
        let path = dir.path().join("prop.adc");
        write_adc(&path, &capture, &config).unwrap();

        let data = read_data(&path).unwrap();
        prop_assert_eq!(data.num_channels(), num_channels);
        prop_assert_eq!(data.num_rows(), num_samples);
        prop_assert_eq!(data.to_capture().unwrap(), capture);
    }
}

#[test]
fn two_channel_ltm9004_capture_roundtrips() {
    let config = AdcConfig::default();
    let mut source = ToneSource::new(config.clone())
        .with_tone(Tone::cycles(101.0, 1024, 6000.0))
        .with_tone(Tone::cycles(37.0, 1024, 3000.0))
        .with_noise(3.0);
    let capture = source.capture(1024).unwrap();

    let dir = tempdir().unwrap();
    let path = dir.path().join("ltm9004.adc");
    write_adc(&path, &capture, &config).unwrap();

    let data = read_data(&path).unwrap();
    assert_eq!(data.num_rows(), 1024);
    assert_eq!(data.num_channels(), 2);
    for (ch, column) in data.channels().iter().enumerate() {
        let expected = capture.channel(ch).unwrap();
        assert!(column.iter().zip(expected).all(|(&a, &b)| a == f64::from(b)));
    }

    let header = read_header(&path).unwrap();
    assert_eq!(header.kind, FileKind::Adc);
    assert_eq!(header.num_channels, 2);
    assert_eq!(header.num_samples(), 1024);
    assert_eq!(header.bits, Some(14));
    assert_eq!(header.min_code, Some(-8192));
    assert_eq!(header.max_code, Some(8192));
}

#[test]
fn three_channel_separators_are_all_dropped() {
    let capture = Capture::new(vec![vec![1, 2], vec![3, 4], vec![5, 6]]).unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("three.adc");
    write_adc(&path, &capture, &AdcConfig::default()).unwrap();

    let data = read_data(&path).unwrap();
    assert_eq!(data.row(0), Some(vec![1.0, 3.0, 5.0]));
    assert_eq!(data.row(1), Some(vec![2.0, 4.0, 6.0]));
    assert_eq!(data.row(2), None);
}

#[test]
fn fft_values_including_negative_infinity_roundtrip() {
    let spectra = vec![
        vec![f64::NEG_INFINITY, -3.25, -120.0, -97.5, -1e-3],
        vec![-6.0, f64::NEG_INFINITY, -80.125, -0.5, -200.0],
    ];
    let dir = tempdir().unwrap();
    let path = dir.path().join("spectra.fft");
    write_fft(&path, &spectra, 8, 62.5).unwrap();

    let record = read_record(&path).unwrap();
    assert_eq!(record.data.channels(), spectra.as_slice());
    assert_eq!(record.header.sample_rate_mhz, 62.5);
    assert_eq!(
        record.axis,
        Axis::Frequency(vec![0.0, 7.8125e6, 15.625e6, 23.4375e6, 31.25e6])
    );
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        read_data(dir.path().join("nope.adc")),
        Err(Error::Io(_))
    ));
}

#[test]
fn invalid_config_creates_no_file() {
    let capture = Capture::new(vec![vec![0; 8]]).unwrap();
    let config = AdcConfig {
        bits: 0,
        ..Default::default()
    };
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.adc");
    assert!(matches!(
        write_adc(&path, &capture, &config),
        Err(Error::Core(narrowband_core::Error::InvalidBits(0)))
    ));
    assert!(!path.exists());
}
