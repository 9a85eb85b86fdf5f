use clap::{Parser, Subcommand};
use std::fs::File;
use std::process::ExitCode;

use site_area::{
    area::shape_area,
    config::CalculatorConfig,
    geometry::{Bounds, LatLng, Shape},
    io::{geojson::write_shapes_geojson, read_latlng_csv, read_shape_json, read_to_string},
    materials::{decode_dimensions, describe, Dimensions, MaterialKind},
    record::{AreasApi, JobTarget},
    session::AreaSession,
    store::AreaDb,
    AreaMethod, Unit,
};

/// Job-site area calculator: measure, convert, save and reload map shapes.
#[derive(Parser)]
#[command(name = "site_area_cli", version)]
struct Cli {
    /// Display unit (sqft, sqm, acres, hectares); overrides the config file
    #[arg(long, global = true)]
    unit: Option<Unit>,
    /// Use the flat-earth approximation instead of spherical area (lower precision)
    #[arg(long, global = true)]
    planar: bool,
    /// JSON file with calculator settings
    #[arg(long, global = true)]
    config: Option<String>,
    /// SQLite file holding saved areas
    #[arg(long, global = true, env = "SITE_AREA_DB", default_value = "areas.db")]
    db: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Area of a polygon given as a CSV file of lat,lng vertices.
    PolygonArea { path: String },
    /// Area of a latitude/longitude box.
    #[command(allow_negative_numbers = true)]
    RectangleArea {
        north: f64,
        south: f64,
        east: f64,
        west: f64,
    },
    /// Area of a circle.
    #[command(allow_negative_numbers = true)]
    CircleArea { lat: f64, lng: f64, radius: f64 },
    /// Area of a shape stored as shape JSON.
    ShapeArea { path: String },
    /// Convert an area value between units.
    Convert { value: f64, from: Unit, to: Unit },
    /// List the supported units.
    Units,
    /// Save a shape JSON file as a named area for a job.
    Save {
        path: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        job: Option<i64>,
        #[arg(long)]
        customer: Option<i64>,
        #[arg(long)]
        user: i64,
    },
    /// List saved areas for a user, optionally for one job.
    List {
        #[arg(long)]
        user: i64,
        #[arg(long)]
        job: Option<i64>,
    },
    /// Reload a saved area and recompute it from its geometry.
    Load {
        id: i64,
        #[arg(long)]
        user: i64,
    },
    /// Delete a saved area.
    Delete {
        id: i64,
        #[arg(long)]
        user: i64,
    },
    /// Export a shape JSON file to GeoJSON.
    ExportGeojson {
        input: String,
        output: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Detect a material's kind and describe its stored dimensions.
    Material {
        name: String,
        /// Stored dimensions JSON, legacy or current format
        #[arg(long)]
        dimensions: Option<String>,
    },
}

fn init_logging() {
    if let Ok(path) = std::env::var("SITE_AREA_LOG") {
        match File::create(&path) {
            Ok(file) => {
                env_logger::Builder::from_default_env()
                    .target(env_logger::Target::Pipe(Box::new(file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Failed to create log file {}: {}", path, e);
                env_logger::Builder::from_default_env().init();
            }
        }
    } else {
        env_logger::Builder::from_default_env().init();
    }
}

fn load_config(cli: &Cli) -> std::io::Result<CalculatorConfig> {
    let mut config = match &cli.config {
        Some(path) => CalculatorConfig::load(path)?,
        None => CalculatorConfig::default(),
    };
    if let Some(unit) = cli.unit {
        config.default_unit = unit;
    }
    if cli.planar {
        config.method = AreaMethod::Planar;
    }
    Ok(config)
}

fn print_area(shape: &Shape, config: &CalculatorConfig) {
    let area = shape_area(shape, config.method);
    let unit = config.default_unit;
    println!("Area: {} {}", unit.format(area), unit.label());
    if unit != Unit::SquareMeters {
        println!("Square meters: {}", Unit::SquareMeters.format(area));
    }
}

fn open_db(path: &str) -> Option<AreaDb> {
    match AreaDb::open(path) {
        Ok(db) => Some(db),
        Err(e) => {
            eprintln!("Error opening {}: {}", path, e);
            None
        }
    }
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if config.method == AreaMethod::Planar {
        log::warn!("using the planar approximation; areas away from the equator are overstated");
    }

    let ok = match cli.command {
        Commands::PolygonArea { path } => match read_latlng_csv(&path) {
            Ok(pts) => match Shape::polygon(pts) {
                Ok(shape) => {
                    print_area(&shape, &config);
                    true
                }
                Err(e) => {
                    eprintln!("Invalid polygon in {}: {}", path, e);
                    false
                }
            },
            Err(e) => {
                eprintln!("Error reading {}: {}", path, e);
                false
            }
        },
        Commands::RectangleArea {
            north,
            south,
            east,
            west,
        } => match Bounds::new(north, south, east, west).and_then(Shape::rectangle) {
            Ok(shape) => {
                print_area(&shape, &config);
                true
            }
            Err(e) => {
                eprintln!("Invalid rectangle: {}", e);
                false
            }
        },
        Commands::CircleArea { lat, lng, radius } => {
            match Shape::circle(LatLng::new(lat, lng), radius) {
                Ok(shape) => {
                    print_area(&shape, &config);
                    true
                }
                Err(e) => {
                    eprintln!("Invalid circle: {}", e);
                    false
                }
            }
        }
        Commands::ShapeArea { path } => match read_shape_json(&path) {
            Ok(shape) => {
                if let Some(c) = shape.center() {
                    println!("Shape: {} centered at {:.6},{:.6}", shape.kind(), c.lat, c.lng);
                }
                print_area(&shape, &config);
                true
            }
            Err(e) => {
                eprintln!("Could not load shape from {}: {}", path, e);
                false
            }
        },
        Commands::Convert { value, from, to } => {
            let m2 = from.to_m2(value);
            println!(
                "{} {} = {} {}",
                value,
                from.label(),
                to.format(m2),
                to.label()
            );
            true
        }
        Commands::Units => {
            for unit in Unit::ALL {
                println!("{}\t{}\t{}", unit.code(), unit.label(), unit.factor());
            }
            true
        }
        Commands::Save {
            path,
            name,
            job,
            customer,
            user,
        } => match (read_shape_json(&path), open_db(&cli.db)) {
            (Ok(shape), Some(mut db)) => {
                let mut session = AreaSession::new(config);
                session.draw(shape);
                session.set_area_name(name);
                if let Some(job) = job {
                    session.select_job(JobTarget::new(job, customer));
                }
                match session.save(&mut db, user) {
                    Ok(rec) => {
                        println!(
                            "Saved area {}: {} {}",
                            rec.id,
                            rec.area_value,
                            rec.unit().label()
                        );
                        true
                    }
                    Err(e) => {
                        eprintln!("Not saved: {}", e);
                        false
                    }
                }
            }
            (Err(e), _) => {
                eprintln!("Could not load shape from {}: {}", path, e);
                false
            }
            (_, None) => false,
        },
        Commands::List { user, job } => match open_db(&cli.db) {
            Some(db) => {
                let records = match job {
                    Some(job) => db.areas_for_job(job, user),
                    None => db.areas_for_user(user),
                };
                match records {
                    Ok(records) => {
                        for rec in records {
                            println!(
                                "{}\t{}\t{} {}\tjob {}",
                                rec.id,
                                rec.area_name,
                                rec.area_value,
                                rec.unit().label(),
                                rec.job_id
                            );
                        }
                        true
                    }
                    Err(e) => {
                        eprintln!("Error listing areas: {}", e);
                        false
                    }
                }
            }
            None => false,
        },
        Commands::Load { id, user } => match open_db(&cli.db) {
            Some(db) => match db.areas_for_user(user) {
                Ok(records) => match records.iter().find(|r| r.id == id) {
                    Some(rec) => {
                        let mut session = AreaSession::new(config);
                        match session.load(rec) {
                            Ok(()) => {
                                if cli.unit.is_some() {
                                    session.set_unit(config.default_unit);
                                }
                                println!("Loaded {} ({})", session.area_name(), rec.unit);
                                println!("Area: {}", session.display_label());
                                if let Some(hint) = session.stored_area_hint() {
                                    println!(
                                        "Stored value: {} {} ({:.2} sq m)",
                                        rec.area_value,
                                        rec.unit().label(),
                                        hint
                                    );
                                }
                                true
                            }
                            Err(e) => {
                                eprintln!("Could not load this shape: {}", e);
                                false
                            }
                        }
                    }
                    None => {
                        eprintln!("No area {} for user {}", id, user);
                        false
                    }
                },
                Err(e) => {
                    eprintln!("Error reading areas: {}", e);
                    false
                }
            },
            None => false,
        },
        Commands::Delete { id, user } => match open_db(&cli.db) {
            Some(mut db) => match db.delete_area(id, user) {
                Ok(true) => {
                    println!("Deleted area {}", id);
                    true
                }
                Ok(false) => {
                    eprintln!("No area {} for user {}", id, user);
                    false
                }
                Err(e) => {
                    eprintln!("Error deleting area: {}", e);
                    false
                }
            },
            None => false,
        },
        Commands::ExportGeojson {
            input,
            output,
            name,
        } => match read_shape_json(&input) {
            Ok(shape) => {
                match write_shapes_geojson(&output, &[(name.as_deref(), &shape)], config.method) {
                    Ok(()) => {
                        println!("Wrote {}", output);
                        true
                    }
                    Err(e) => {
                        eprintln!("Error writing {}: {}", output, e);
                        false
                    }
                }
            }
            Err(e) => {
                eprintln!("Error reading {}: {}", input, e);
                false
            }
        },
        Commands::Material { name, dimensions } => match MaterialKind::detect(&name) {
            Some(kind) => {
                println!("Type: {}", kind.name());
                println!("Default unit: {}", kind.default_unit());
                match dimensions {
                    Some(text) => match read_dimensions_arg(&text) {
                        Ok(dims) => {
                            if let Some(line) = describe(kind, &dims) {
                                println!("{}", line);
                            }
                            true
                        }
                        Err(e) => {
                            eprintln!("Invalid dimensions: {}", e);
                            false
                        }
                    },
                    None => true,
                }
            }
            None => {
                println!("Type: unknown");
                true
            }
        },
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Accepts inline JSON or `@path` to read it from a file.
fn read_dimensions_arg(text: &str) -> Result<Dimensions, String> {
    let json = match text.strip_prefix('@') {
        Some(path) => read_to_string(path).map_err(|e| format!("{}: {}", path, e))?,
        None => text.to_string(),
    };
    let value: serde_json::Value = serde_json::from_str(&json).map_err(|e| e.to_string())?;
    decode_dimensions(&value).map_err(|e| e.to_string())
}
