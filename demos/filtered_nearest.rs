//! Nearest neighbors with a per-entity filter and a custom entity type.
use kdtree::prelude::*;

#[derive(Debug)]
struct Unit {
    position: DVec3,
    team: u8,
    hidden: bool,
}

impl PositionedEntity for Unit {
    type Point = DVec3;

    fn position(&self) -> DVec3 {
        self.position
    }
}

fn main() {
    env_logger::init();

    let units: Vec<Unit> = (0..64)
        .map(|i| Unit {
            position: DVec3::new(f64::from(i % 8) * 3.0, f64::from(i / 8) * 3.0, 0.0),
            team: u8::from(i % 2 == 1),
            hidden: i % 5 == 0,
        })
        .collect();
    let tree = match KdTree::build(units, 4) {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };

    let observer = DVec3::new(10.0, 10.0, 0.0);

    // Visible enemies within 8 units. Hidden units are excluded and the
    // distance is the plain squared distance.
    let enemies = tree.nearest_filtered(observer, 5, 8.0, |unit| {
        (unit.team == 1 && !unit.hidden).then(|| unit.position.distance_squared(observer))
    });

    match enemies {
        Ok(Some(mut found)) => {
            kdtree::accumulator::sort_by_distance(&mut found);
            for neighbor in found {
                println!("{:?} at {:.2}", neighbor.item.position, neighbor.distance.sqrt());
            }
        }
        Ok(None) => println!("no visible enemy in range"),
        Err(err) => eprintln!("{err}"),
    }
}
