#![allow(dead_code)]

use fake::faker::name::en::Name;
use fake::{Fake, Faker};
use spot_cache::{Media, MediaKind, Spot, SpotId};
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn fake_spot(id: i64) -> Spot {
    Spot::new(
        id,
        Name().fake::<String>(),
        (-80.0..80.0).fake::<f64>(),
        (-179.0..179.0).fake::<f64>(),
    )
}

pub fn fake_spot_near(id: i64, latitude: f64, longitude: f64) -> Spot {
    Spot::new(id, Name().fake::<String>(), latitude, longitude)
}

pub fn fake_media(spot_id: SpotId, count: u32) -> Vec<Media> {
    (0..count)
        .map(|position| {
            Media::new(
                Faker.fake::<u32>() as i64,
                spot_id,
                format!("https://cdn.example.test/{}.jpg", Faker.fake::<u32>()),
                MediaKind::Image,
                position,
            )
        })
        .collect()
}
