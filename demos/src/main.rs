//! Capture a small hut, save it, load it in a session whose packages were
//! registered in a different order, and stamp it twice into a new world.
//!
//! Run: cargo run --bin stamp-roundtrip [path]

use std::error::Error;
use std::path::PathBuf;

use tilestamp::{PlaceConfig, Placer, Structure};
use tilestamp_core::{
    Anchor, Catalog, CompositeDef, ContainerStore, ContentCatalog, ContentKind, Liquid, LiquidKind,
    Point, PortableRef, Range, Tile, TileAccess, TileWorld, UnresolvedContent,
};

const STONE: u16 = 1;
const PLANK: u16 = 2;
const STONE_WALL: u16 = 1;

fn session(extra_packages: bool) -> Catalog {
    let mut catalog = Catalog::new(16, 8);
    if extra_packages {
        catalog.register(ContentKind::Tile, "mine", "ore");
        catalog.register(ContentKind::Wall, "mine", "shaft");
    }
    let chest = catalog.register(ContentKind::Tile, "orchard", "chest");
    let lamp = catalog.register(ContentKind::Tile, "orchard", "lamp");
    catalog.register(ContentKind::Wall, "orchard", "moss");
    catalog.define_composite(
        chest,
        CompositeDef::new(2, 1).with_anchor(Anchor::Bottom).as_container(),
    );
    catalog.define_composite(lamp, CompositeDef::new(1, 2).with_anchor(Anchor::Wall));
    catalog
}

fn hut(catalog: &Catalog) -> Result<TileWorld, UnresolvedContent> {
    let id = |kind, name: &str| catalog.resolve(kind, &PortableRef::new("orchard", name));
    let chest = id(ContentKind::Tile, "chest")?;
    let lamp = id(ContentKind::Tile, "lamp")?;
    let moss = id(ContentKind::Wall, "moss")?;

    let mut w = TileWorld::new(8, 5);
    w.fill(Range::new(1, 0, 7, 4), Tile::AIR.with_wall(moss));
    w.fill(Range::new(0, 4, 8, 5), Tile::solid(STONE));
    for y in 0..4 {
        w.set_tile(Point::new(0, y), Tile::solid(PLANK).with_wall(STONE_WALL));
        w.set_tile(Point::new(7, y), Tile::solid(PLANK).with_wall(STONE_WALL));
    }
    w.update(Point::new(2, 3), |t| *t = Tile::solid(chest).with_wall(moss));
    w.update(Point::new(3, 3), |t| *t = Tile::solid(chest).with_frame(1, 0).with_wall(moss));
    w.update(Point::new(5, 1), |t| *t = Tile::solid(lamp).with_wall(moss));
    w.update(Point::new(5, 2), |t| *t = Tile::solid(lamp).with_frame(0, 1).with_wall(moss));
    w.update(Point::new(6, 3), |t| t.liquid = Liquid::new(LiquidKind::Water, 200));
    Ok(w)
}

fn render(w: &TileWorld) -> String {
    let mut out = String::new();
    for y in 0..w.height() {
        for x in 0..w.width() {
            let c = match w.tile(Point::new(x, y)) {
                Some(t) if t.active && t.content == STONE => '#',
                Some(t) if t.active && t.content == PLANK => '|',
                Some(t) if t.active => 'o',
                Some(t) if !t.liquid.is_empty() => '~',
                Some(t) if t.has_wall() => '.',
                _ => ' ',
            };
            out.push(c);
        }
        out.push('\n');
    }
    out
}

fn run(path: PathBuf) -> Result<(), Box<dyn Error>> {
    let here = session(false);
    let src = hut(&here)?;
    println!("source:\n{}", render(&src));

    let stamp = Structure::capture(&src, src.bounds(), &here);
    let path = tilestamp::save(path, &stamp)?;

    let there = session(true);
    let stamp = tilestamp::load(&path, &there)?;
    log::info!(
        "loaded {}x{} stamp: {} tile entries, {} wall entries",
        stamp.width(),
        stamp.height(),
        stamp.tile_table().len(),
        stamp.wall_table().len()
    );

    let mut dst = TileWorld::new(20, 7);
    let mut placer = Placer::new(&there)
        .with_containers(ContainerStore::new())
        .with_config(PlaceConfig {
            verify_footprint: true,
            ..PlaceConfig::default()
        });
    for origin in [Point::new(1, 1), Point::new(11, 1)] {
        let report = placer.place(&mut dst, &stamp, origin)?;
        log::info!("placed at {origin}: {report:?}");
    }
    println!("destination:\n{}", render(&dst));
    println!("containers: {}", placer.containers().len());
    Ok(())
}

fn main() {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("hut"));

    if let Err(e) = run(path) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
