//! Find K nearest points to a position.
use kdtree::prelude::*;

fn main() {
    let points = vec![
        (Vec2::new(0.0, 0.0), "a"),
        (Vec2::new(2.0, 2.0), "b"),
        (Vec2::new(4.0, 4.0), "c"),
        (Vec2::new(6.0, 6.0), "d"),
    ];
    let tree = match KdTree::build(points, 2) {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    match tree.nearest_sorted(Vec2::new(2.5, 2.5), 2, f32::INFINITY) {
        Ok(found) => {
            for neighbor in found {
                println!("{} at squared distance {}", neighbor.item.1, neighbor.distance);
            }
        }
        Err(err) => eprintln!("{err}"),
    }

    match tree.nearest_one(Vec2::new(5.9, 5.0)) {
        Ok(Some(best)) => println!("closest to (5.9, 5.0): {}", best.item.1),
        Ok(None) => println!("tree is empty"),
        Err(err) => eprintln!("{err}"),
    }
}
