// The fixed set of partial-credit fractions the question bank accepts.
// Grading always snaps to the nearest member; ties keep the earliest
// candidate in this order.
pub const GRADE_OPTIONS: [f64; 41] = [
    1.0, 0.9, 0.8333333, 0.8, 0.75, 0.7, 0.6666667, 0.6, 0.5, 0.4, 0.3333333, 0.3, 0.25, 0.2,
    0.1666667, 0.1428571, 0.125, 0.1111111, 0.1, 0.05, 0.0, -0.05, -0.1, -0.1111111, -0.125,
    -0.1428571, -0.1666667, -0.2, -0.25, -0.3, -0.3333333, -0.4, -0.5, -0.6, -0.6666667, -0.7,
    -0.75, -0.8, -0.8333333, -0.9, -1.0,
];

pub fn nearest_grade(target: f64) -> f64 {
    let mut best = GRADE_OPTIONS[0];
    let mut distance = f64::INFINITY;
    for &option in &GRADE_OPTIONS {
        let candidate = (option - target).abs();
        if candidate < distance {
            distance = candidate;
            best = option;
        }
    }
    best
}
