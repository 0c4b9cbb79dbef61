use qconv_shape::{
    ConvParam, ConvShapeError, conv_output_shape, conv_output_size, conv1d_output_shape,
    conv2d_output_shape, conv3d_output_shape,
};

/// Per-dimension `(input_size, kernel_size, stride, padding, dilation)`.
const DIMS: [(usize, usize, usize, usize, usize); 3] =
    [(17, 3, 2, 1, 1), (9, 2, 1, 0, 3), (32, 5, 3, 2, 2)];

fn columns<const D: usize>(
    dims: [(usize, usize, usize, usize, usize); D],
) -> [[usize; D]; 5] {
    let mut columns = [[0; D]; 5];
    for (i, (input, kernel, stride, padding, dilation)) in dims.into_iter().enumerate() {
        columns[0][i] = input;
        columns[1][i] = kernel;
        columns[2][i] = stride;
        columns[3][i] = padding;
        columns[4][i] = dilation;
    }
    columns
}

fn check_rank_invariance<const D: usize>(dims: [(usize, usize, usize, usize, usize); D]) {
    let [input, kernel, stride, padding, dilation] = columns(dims);

    let shape =
        conv_output_shape::<D>(3, 7, &input, &kernel, &stride, &padding, &dilation).unwrap();

    assert_eq!(shape.to_vec().len(), D + 2);
    assert_eq!(shape.batch_size, 3);
    assert_eq!(shape.channels, 7);
    for (i, (input, kernel, stride, padding, dilation)) in dims.into_iter().enumerate() {
        assert_eq!(
            shape.spatial[i],
            conv_output_size(input, kernel, stride, padding, dilation).unwrap(),
            "Spatial dimension {i} should only depend on its own parameters"
        );
    }

    let mut reversed = dims;
    reversed.reverse();
    let [input, kernel, stride, padding, dilation] = columns(reversed);
    let permuted =
        conv_output_shape::<D>(3, 7, &input, &kernel, &stride, &padding, &dilation).unwrap();

    let mut expected = shape.spatial;
    expected.reverse();
    assert_eq!(permuted.spatial, expected);
}

#[test]
fn rank_invariance_1d() {
    check_rank_invariance::<1>([DIMS[0]]);
}

#[test]
fn rank_invariance_2d() {
    check_rank_invariance::<2>([DIMS[0], DIMS[1]]);
}

#[test]
fn rank_invariance_3d() {
    check_rank_invariance::<3>(DIMS);
}

fn stride_mismatch<T>(expected: usize) -> Result<T, ConvShapeError> {
    Err(ConvShapeError::ShapeMismatch {
        param: ConvParam::Stride,
        expected,
        actual: expected - 1,
    })
}

#[test]
fn short_stride_is_rejected_for_every_rank() {
    assert_eq!(
        conv1d_output_shape(1, 1, &[8], &[3], &[], &[0], &[1]),
        stride_mismatch(1)
    );
    assert_eq!(
        conv2d_output_shape(1, 1, &[8, 8], &[3, 3], &[1], &[0, 0], &[1, 1]),
        stride_mismatch(2)
    );
    assert_eq!(
        conv3d_output_shape(1, 1, &[8, 8, 8], &[3, 3, 3], &[1, 1], &[0, 0, 0], &[1, 1, 1]),
        stride_mismatch(3)
    );
}

#[test]
fn identical_inputs_give_identical_results_across_threads() {
    let expected = conv3d_output_shape(
        4,
        16,
        &[17, 9, 32],
        &[3, 2, 5],
        &[2, 1, 3],
        &[1, 0, 2],
        &[1, 3, 2],
    );
    let degenerate = conv1d_output_shape(1, 1, &[3], &[5], &[1], &[0], &[1]);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    (
                        conv3d_output_shape(
                            4,
                            16,
                            &[17, 9, 32],
                            &[3, 2, 5],
                            &[2, 1, 3],
                            &[1, 0, 2],
                            &[1, 3, 2],
                        ),
                        conv1d_output_shape(1, 1, &[3], &[5], &[1], &[0], &[1]),
                    )
                })
            })
            .collect();

        for handle in handles {
            let (shape, error) = handle.join().unwrap();
            assert_eq!(shape, expected);
            assert_eq!(error, degenerate);
        }
    });

    assert_eq!(expected, Ok([4, 16, 9, 6, 10]));
    assert!(degenerate.is_err());
}
