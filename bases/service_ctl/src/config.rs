use crate::error::{CtlError, Result};
use clap::{Args, Parser, Subcommand};
use field_primitives::{EntityId, EquipmentKind, LocationLevel, ServiceType};
use std::path::PathBuf;

const DEFAULT_LOG_FILTER: &str =
    "service_ctl=info,provisioning_wizard=info,cascading_selector=info,circuit_assignment=info";
const VERBOSE_LOG_FILTER: &str =
    "service_ctl=debug,provisioning_wizard=debug,cascading_selector=debug,circuit_assignment=debug,field_repository=debug";

/// Field service provisioning against a fixture backend
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Log at debug level (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Convert between circuit numbers and range text
    Ranges {
        #[command(subcommand)]
        action: RangesCommand,
    },

    /// Walk the location cascade and print each level's options
    Locations {
        #[arg(long)]
        fixture: PathBuf,

        #[command(flatten)]
        path: LocationArgs,
    },

    /// Run the whole provisioning wizard and create a service
    Provision(ProvisionArgs),
}

#[derive(Subcommand, Debug, Clone)]
pub enum RangesCommand {
    /// Print the range text of a set of circuit numbers
    Encode {
        #[arg(allow_negative_numbers = true)]
        values: Vec<i64>,
    },
    /// Print the numbers described by range text
    Decode { text: String },
}

#[derive(Args, Debug, Clone, Default)]
pub struct LocationArgs {
    #[arg(long)]
    pub client: Option<String>,
    #[arg(long)]
    pub plant: Option<String>,
    #[arg(long)]
    pub area: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ProvisionArgs {
    #[arg(long)]
    pub fixture: PathBuf,

    /// MAINTENANCE, INSPECTION or RAISE_OBSERVATION
    #[arg(long)]
    pub service_type: ServiceType,

    #[command(flatten)]
    pub path: LocationArgs,

    /// CABINET or PANEL
    #[arg(long)]
    pub equipment_kind: EquipmentKind,

    #[arg(long)]
    pub equipment: String,

    #[arg(long)]
    pub supervisor: String,

    #[arg(long)]
    pub project: Option<String>,

    #[arg(long)]
    pub observations: Option<String>,
}

/// Location selections, root first
pub type LocationPath = Vec<(LocationLevel, EntityId)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionTask {
    pub fixture: PathBuf,
    pub service_type: ServiceType,
    pub path: LocationPath,
    pub equipment_kind: EquipmentKind,
    pub equipment_id: EntityId,
    pub supervisor: String,
    pub project_id: Option<EntityId>,
    pub observations: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    EncodeRanges(Vec<i64>),
    DecodeRanges(String),
    Locations { fixture: PathBuf, path: LocationPath },
    Provision(ProvisionTask),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub task: Task,
    /// Used when RUST_LOG is not set
    pub log_filter: &'static str,
}

impl LocationArgs {
    /// Turn the flags into a root-first path; a level needs every level above it
    fn into_path(self) -> Result<LocationPath> {
        let given = [
            (LocationLevel::Client, self.client),
            (LocationLevel::Plant, self.plant),
            (LocationLevel::Area, self.area),
            (LocationLevel::Location, self.location),
        ];

        let mut path = Vec::new();
        let mut gap: Option<LocationLevel> = None;
        for (level, id) in given {
            match (id, gap) {
                (Some(_), Some(missing)) => {
                    return Err(CtlError::MissingParent {
                        level,
                        parent: missing,
                    })
                }
                (Some(id), None) => path.push((level, EntityId::new(id))),
                (None, None) => gap = Some(level),
                (None, Some(_)) => {}
            }
        }
        Ok(path)
    }
}

impl Config {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let task = match args.command {
            Command::Ranges {
                action: RangesCommand::Encode { values },
            } => Task::EncodeRanges(values),
            Command::Ranges {
                action: RangesCommand::Decode { text },
            } => Task::DecodeRanges(text),
            Command::Locations { fixture, path } => Task::Locations {
                fixture,
                path: path.into_path()?,
            },
            Command::Provision(args) => Task::Provision(ProvisionTask {
                fixture: args.fixture,
                service_type: args.service_type,
                path: args.path.into_path()?,
                equipment_kind: args.equipment_kind,
                equipment_id: EntityId::new(args.equipment),
                supervisor: args.supervisor,
                project_id: args.project.map(EntityId::new),
                observations: args.observations,
            }),
        };

        let log_filter = if args.verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        };

        Ok(Self { task, log_filter })
    }
}
