use crate::square::Position;

/// Cheapest possible square, approached as distance from origin grows.
pub const BASE_PRICE: f64 = 10.0;
/// Price of the origin square (0,0).
pub const MAX_PRICE: f64 = 99.0;

/// Distance at which the premium over base has decayed to half.
const DECAY_DISTANCE: f64 = 100.0;

/// Price of a cell as a pure function of its distance from the origin.
///
/// `BASE + (MAX - BASE) / (1 + d/100)`, capped at MAX and rounded to cents.
/// Total over all integer positions; monotone non-increasing in distance.
pub fn square_price(position: Position) -> f64 {
    let x = position.x as f64;
    let y = position.y as f64;
    let distance = (x * x + y * y).sqrt();
    let price = BASE_PRICE + (MAX_PRICE - BASE_PRICE) / (1.0 + distance / DECAY_DISTANCE);
    round_cents(price.min(MAX_PRICE))
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_costs_the_maximum() {
        assert_eq!(square_price(Position::new(0, 0)), MAX_PRICE);
    }

    #[test]
    fn price_stays_within_bounds_everywhere() {
        let samples = [
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(-1, -1),
            Position::new(100, 0),
            Position::new(-250, 250),
            Position::new(10_000, -10_000),
            Position::new(i32::MAX as i64, i32::MAX as i64),
        ];
        for pos in samples {
            let price = square_price(pos);
            assert!(
                (BASE_PRICE..=MAX_PRICE).contains(&price),
                "price {price} out of bounds at {},{}",
                pos.x,
                pos.y
            );
        }
    }

    #[test]
    fn price_never_increases_with_distance() {
        // Walk outward along a diagonal and an axis.
        let mut last = f64::INFINITY;
        for step in 0..200 {
            let price = square_price(Position::new(step * 7, step * 3));
            assert!(price <= last, "price rose at step {step}");
            last = price;
        }
        let mut last = f64::INFINITY;
        for x in 0..500 {
            let price = square_price(Position::new(x, 0));
            assert!(price <= last, "price rose at x={x}");
            last = price;
        }
    }

    #[test]
    fn price_approaches_base_far_from_origin() {
        let far = square_price(Position::new(5_000_000, 0));
        assert!(far - BASE_PRICE < 0.01, "far price was {far}");
    }

    #[test]
    fn price_is_rounded_to_cents() {
        // d = 100 -> 10 + 89/2 = 54.5 exactly.
        assert_eq!(square_price(Position::new(100, 0)), 54.5);
        // d = 50 -> 10 + 89/1.5 = 69.333... -> 69.33.
        assert_eq!(square_price(Position::new(50, 0)), 69.33);
    }
}
