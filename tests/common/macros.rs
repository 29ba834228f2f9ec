/// Asserts that a creature's graph holds a neuron with the given name.
#[macro_export]
macro_rules! assert_has_neuron {
    ($creature:expr, $name:expr) => {
        assert!(
            $creature.graph().contains($name),
            "Neuron {} not found in graph",
            $name
        );
    };
}

/// Asserts that no neuron with the given name exists.
#[macro_export]
macro_rules! assert_no_neuron {
    ($creature:expr, $name:expr) => {
        assert!(
            !$creature.graph().contains($name),
            "Neuron {} should be absent but was found",
            $name
        );
    };
}

/// Asserts that every stored weight lies in [-1, 1].
#[macro_export]
macro_rules! assert_weights_bounded {
    ($graph:expr) => {
        for (from, to, w) in $graph.weights() {
            assert!(
                (-1.0..=1.0).contains(&w),
                "Weight {} -> {} out of bounds: {}",
                from,
                to,
                w
            );
        }
    };
}

/// Asserts the status label of a tick's decision.
#[macro_export]
macro_rules! assert_status {
    ($report:expr, $status:expr) => {
        let decision = $report.decision.as_ref().expect("tick made no decision");
        assert_eq!(decision.status, $status, "Unexpected status");
    };
}
