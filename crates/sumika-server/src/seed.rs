//! Sample-data helper behind the server's `--seed` flag.
//!
//! Inserts a handful of demo listings. Viewing slots are not pre-created;
//! they materialize on the first slot request for a day.

use sumika_core::{property::NewProperty, store::ViewingStore as _};
use sumika_store_sqlite::SqliteStore;

pub async fn run(store: &SqliteStore) -> anyhow::Result<()> {
  let listings = sample_listings();
  let count = listings.len();

  for listing in listings {
    let property = store.add_property(listing).await?;
    tracing::info!(id = %property.property_id, name = %property.name, "seeded listing");
  }

  tracing::info!("seeded {count} listings");
  Ok(())
}

fn sample_listings() -> Vec<NewProperty> {
  vec![
    NewProperty {
      name:        "サンライズマンション 301号室".to_string(),
      address:     "東京都渋谷区神宮前1-2-3".to_string(),
      description: "駅徒歩5分、南向きで日当たり良好。リノベーション済みの綺麗なお部屋です。"
        .to_string(),
      image_url:   "https://images.unsplash.com/photo-1522708323590-d24dbb6b0267?w=800"
        .to_string(),
      rent:        120_000,
      layout:      "1LDK".to_string(),
      floor_size:  45.5,
    },
    NewProperty {
      name:        "グリーンハイツ 205号室".to_string(),
      address:     "東京都世田谷区三宿2-10-5".to_string(),
      description: "閑静な住宅街、緑豊かな環境。ファミリー向けの広々とした間取りです。"
        .to_string(),
      image_url:   "https://images.unsplash.com/photo-1512917774080-9991f1c4c750?w=800"
        .to_string(),
      rent:        180_000,
      layout:      "2LDK".to_string(),
      floor_size:  65.0,
    },
    NewProperty {
      name:        "オーシャンビュー 1202号室".to_string(),
      address:     "神奈川県横浜市中区海岸通り4-5-6".to_string(),
      description: "海が見える高層マンション。眺望抜群、充実した共用施設。".to_string(),
      image_url:   "https://images.unsplash.com/photo-1560448204-e02f11c3d0e2?w=800"
        .to_string(),
      rent:        250_000,
      layout:      "3LDK".to_string(),
      floor_size:  85.0,
    },
  ]
}
