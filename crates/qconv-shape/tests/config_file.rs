use qconv_shape::{Config, ConfigError, ConvShapeConfig, conv_output_shape};
use tempfile::tempdir;

#[test]
fn save_then_load() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("conv.json");

    let config = ConvShapeConfig::new(32, vec![3, 3])
        .with_stride(vec![2, 2])
        .with_padding(vec![1, 1]);
    config.save(&file_path).unwrap();

    let loaded = ConvShapeConfig::load(&file_path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn load_missing_file() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("missing.json");

    let result = ConvShapeConfig::load(&file_path);

    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn loaded_config_agrees_with_direct_call() {
    let dir = tempdir().unwrap();
    let file_path = dir.path().join("conv3d.json");
    std::fs::write(
        &file_path,
        r#"{
            "channels_out": 4,
            "kernel_size": [3, 3, 3],
            "stride": [1, 2, 2],
            "dilation": [2, 1, 1]
        }"#,
    )
    .unwrap();

    let config = ConvShapeConfig::load(&file_path).unwrap();
    let shape = config.output_shape(2, [10, 16, 16]).unwrap();
    let direct = conv_output_shape::<3>(
        2,
        4,
        &[10, 16, 16],
        &[3, 3, 3],
        &[1, 2, 2],
        &[0, 0, 0],
        &[2, 1, 1],
    )
    .unwrap();

    assert_eq!(shape, direct);
    assert_eq!(shape.dims::<5>(), [2, 4, 6, 7, 7]);
}
