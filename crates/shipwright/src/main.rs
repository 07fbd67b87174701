mod commands;
mod reporter;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use commands::Reported;
use shipwright_config::ProfileFlags;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "shipwright")]
#[command(about = "Create, inspect and delete ECS and supporting EC2 resources with verified jobs", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct GlobalArgs {
    /// Named AWS profile
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Static access key id (requires --access-key-secret)
    #[arg(long, global = true)]
    access_key_id: Option<String>,

    /// Static secret access key (requires --access-key-id)
    #[arg(long, global = true)]
    access_key_secret: Option<String>,

    /// AWS region
    #[arg(long, global = true)]
    region: Option<String>,

    /// Report levels to print: quiet, records, jobs, aws (repeatable)
    #[arg(long = "report", global = true, value_name = "LEVEL")]
    reports: Vec<String>,

    /// Path to the aws executable
    #[arg(
        long,
        global = true,
        env = "SHIPWRIGHT_AWS_CLI",
        default_value = "aws",
        hide = true
    )]
    aws_cli: String,
}

impl GlobalArgs {
    fn profile_flags(&self) -> ProfileFlags {
        ProfileFlags {
            profile: self.profile.clone(),
            access_key_id: self.access_key_id.clone(),
            access_key_secret: self.access_key_secret.clone(),
            region: self.region.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// ECS clusters
    Clusters {
        #[command(subcommand)]
        action: SimpleCommands,
    },
    /// Auto Scaling launch configurations
    Launchconfigs {
        #[command(subcommand)]
        action: LaunchConfigCommands,
    },
    /// Auto Scaling groups
    Scalinggroups {
        #[command(subcommand)]
        action: ScalingGroupCommands,
    },
    /// EC2 security groups
    Securitygroups {
        #[command(subcommand)]
        action: SecurityGroupCommands,
    },
    /// ECS task definition families
    Taskdefinitions {
        #[command(subcommand)]
        action: TaskDefinitionCommands,
    },
    /// ECS tasks of one cluster
    Tasks {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// ECS services of one cluster
    Services {
        #[command(subcommand)]
        action: ServiceCommands,
    },
    /// EC2 availability zones
    Zones {
        #[command(subcommand)]
        action: ZoneCommands,
    },
    /// Print version information
    Version,
}

#[derive(Subcommand)]
enum SimpleCommands {
    /// List all
    List,
    /// Create one by name
    Create { name: String },
    /// Delete one by name
    Delete { name: String },
}

#[derive(Subcommand)]
enum LaunchConfigCommands {
    /// List all launch configurations
    List,
    /// Create a launch configuration
    Create {
        name: String,
        /// Image id (defaults to the ECS-optimized AMI of the region)
        #[arg(long)]
        ami: Option<String>,
        /// EC2 instance type
        #[arg(long, default_value = "t2.micro")]
        instance_type: String,
        /// IAM instance profile
        #[arg(long)]
        instance_profile: Option<String>,
        /// Security group id (repeatable)
        #[arg(long = "security-group", value_name = "GROUP")]
        security_groups: Vec<String>,
        /// EC2 key pair name
        #[arg(long)]
        key_pair: Option<String>,
        /// File with instance user data
        #[arg(long)]
        user_data: Option<PathBuf>,
        /// Associate a public IP address
        #[arg(long)]
        public_ip: bool,
    },
    /// Delete a launch configuration
    Delete { name: String },
}

#[derive(Subcommand)]
enum ScalingGroupCommands {
    /// List auto scaling groups
    List,
    /// Create an auto scaling group from a launch configuration
    Create {
        name: String,
        /// Launch configuration the instances are started from
        #[arg(long)]
        launch_config: String,
        /// Minimum number of instances
        #[arg(long, default_value_t = 1)]
        min_size: u32,
        /// Maximum number of instances
        #[arg(long, default_value_t = 1)]
        max_size: u32,
        /// Number of instances to start with
        #[arg(long, default_value_t = 1)]
        desired_size: u32,
        /// Availability zone (repeatable)
        #[arg(long = "zone", value_name = "ZONE")]
        zones: Vec<String>,
        /// Subnet id (repeatable)
        #[arg(long = "subnet", value_name = "SUBNET")]
        subnets: Vec<String>,
    },
    /// Force-delete an auto scaling group and its instances
    Delete { name: String },
}

#[derive(Subcommand)]
enum SecurityGroupCommands {
    /// List security groups
    List,
    /// Create a security group
    Create {
        name: String,
        /// Group description (defaults to the name)
        #[arg(long)]
        description: Option<String>,
        /// VPC id (defaults to the default VPC)
        #[arg(long)]
        vpc: Option<String>,
    },
    /// Delete a security group by name
    Delete { name: String },
}

#[derive(Subcommand)]
enum TaskDefinitionCommands {
    /// List active task definition families
    List,
    /// Register a task definition family from a JSON document
    Create {
        /// Family name
        name: String,
        /// JSON file with the task definition (containerDefinitions etc.)
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Deregister every active revision of a family
    Delete { name: String },
}

#[derive(Args, Debug, Clone)]
struct ClusterArg {
    /// Cluster the resource lives in
    #[arg(long)]
    cluster: String,
}

#[derive(Subcommand)]
enum TaskCommands {
    /// List tasks
    List {
        #[command(flatten)]
        scope: ClusterArg,
    },
    /// Run a task, named by its started-by tag
    Create {
        name: String,
        #[command(flatten)]
        scope: ClusterArg,
        /// Task definition (family or family:revision)
        #[arg(long)]
        task_definition: String,
    },
    /// Stop a task
    Delete {
        name: String,
        #[command(flatten)]
        scope: ClusterArg,
    },
}

#[derive(Subcommand)]
enum ServiceCommands {
    /// List active services
    List {
        #[command(flatten)]
        scope: ClusterArg,
    },
    /// Create a service
    Create {
        name: String,
        #[command(flatten)]
        scope: ClusterArg,
        /// Task definition (family or family:revision)
        #[arg(long)]
        task_definition: String,
        /// Number of tasks to keep running
        #[arg(long, default_value_t = 1)]
        desired_count: u32,
    },
    /// Scale a service to zero and delete it
    Delete {
        name: String,
        #[command(flatten)]
        scope: ClusterArg,
    },
}

#[derive(Subcommand)]
enum ZoneCommands {
    /// List availability zones
    List,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Job failures have already gone through the error channel
            if err.downcast_ref::<Reported>().is_none() {
                eprintln!("{} {:#}", "Error:".red().bold(), err);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if matches!(cli.command, Commands::Version) {
        println!("shipwright {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let settings = shipwright_config::Settings::load()?;
    let reports = shipwright_config::resolve_reports(&cli.global.reports, &settings)?;
    let profile = shipwright_config::resolve_profile(&cli.global.profile_flags(), &settings)?;
    tracing::debug!(?profile, "resolved profile");

    let session = commands::Session::new(profile, reports, &cli.global.aws_cli);

    match cli.command {
        Commands::Clusters { action } => match action {
            SimpleCommands::List => commands::clusters::list(&session).await,
            SimpleCommands::Create { name } => commands::clusters::create(&session, &name).await,
            SimpleCommands::Delete { name } => commands::clusters::delete(&session, &name).await,
        },
        Commands::Launchconfigs { action } => match action {
            LaunchConfigCommands::List => commands::launchconfigs::list(&session).await,
            LaunchConfigCommands::Create {
                name,
                ami,
                instance_type,
                instance_profile,
                security_groups,
                key_pair,
                user_data,
                public_ip,
            } => {
                let options = commands::launchconfigs::CreateOptions {
                    ami,
                    instance_type,
                    instance_profile,
                    security_groups,
                    key_pair,
                    user_data,
                    public_ip,
                };
                commands::launchconfigs::create(&session, &name, options).await
            }
            LaunchConfigCommands::Delete { name } => {
                commands::launchconfigs::delete(&session, &name).await
            }
        },
        Commands::Scalinggroups { action } => match action {
            ScalingGroupCommands::List => commands::scalinggroups::list(&session).await,
            ScalingGroupCommands::Create {
                name,
                launch_config,
                min_size,
                max_size,
                desired_size,
                zones,
                subnets,
            } => {
                let options = commands::scalinggroups::CreateOptions {
                    launch_config,
                    min_size,
                    max_size,
                    desired_size,
                    zones,
                    subnets,
                };
                commands::scalinggroups::create(&session, &name, options).await
            }
            ScalingGroupCommands::Delete { name } => {
                commands::scalinggroups::delete(&session, &name).await
            }
        },
        Commands::Securitygroups { action } => match action {
            SecurityGroupCommands::List => commands::securitygroups::list(&session).await,
            SecurityGroupCommands::Create {
                name,
                description,
                vpc,
            } => commands::securitygroups::create(&session, &name, description, vpc).await,
            SecurityGroupCommands::Delete { name } => {
                commands::securitygroups::delete(&session, &name).await
            }
        },
        Commands::Taskdefinitions { action } => match action {
            TaskDefinitionCommands::List => commands::taskdefinitions::list(&session).await,
            TaskDefinitionCommands::Create { name, file } => {
                commands::taskdefinitions::create(&session, &name, &file).await
            }
            TaskDefinitionCommands::Delete { name } => {
                commands::taskdefinitions::delete(&session, &name).await
            }
        },
        Commands::Tasks { action } => match action {
            TaskCommands::List { scope } => commands::tasks::list(&session, &scope.cluster).await,
            TaskCommands::Create {
                name,
                scope,
                task_definition,
            } => commands::tasks::create(&session, &scope.cluster, &name, &task_definition).await,
            TaskCommands::Delete { name, scope } => {
                commands::tasks::delete(&session, &scope.cluster, &name).await
            }
        },
        Commands::Services { action } => match action {
            ServiceCommands::List { scope } => {
                commands::services::list(&session, &scope.cluster).await
            }
            ServiceCommands::Create {
                name,
                scope,
                task_definition,
                desired_count,
            } => {
                commands::services::create(
                    &session,
                    &scope.cluster,
                    &name,
                    &task_definition,
                    desired_count,
                )
                .await
            }
            ServiceCommands::Delete { name, scope } => {
                commands::services::delete(&session, &scope.cluster, &name).await
            }
        },
        Commands::Zones { action } => match action {
            ZoneCommands::List => commands::zones::list(&session).await,
        },
        Commands::Version => Ok(()),
    }
}
