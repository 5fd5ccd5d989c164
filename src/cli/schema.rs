use crate::cli::{
    CommandKind, DsmArgs, FilterArgs, ImageArgs, InputArgs, MetricsArgs, TextArgs, BIN_NAME,
};
use clap::Args;

type Augment = fn(clap::Command) -> clap::Command;

/// Command-specific option sets, layered on top of the shared ones.
const SPECIFIC_ARGS: [(CommandKind, Augment); 5] = [
    (CommandKind::Uml, <ImageArgs as Args>::augment_args),
    (CommandKind::Dot, <ImageArgs as Args>::augment_args),
    (CommandKind::Dsm, <DsmArgs as Args>::augment_args),
    (CommandKind::Text, <TextArgs as Args>::augment_args),
    (CommandKind::Metrics, <MetricsArgs as Args>::augment_args),
];

/// Option schema of an analysis command: shared input and filter options
/// plus the command's own. Parses the tokens that follow the command name.
pub fn command_schema(kind: CommandKind) -> clap::Command {
    let cmd = clap::Command::new(kind.name())
        .about(kind.about())
        .bin_name(format!("{BIN_NAME} {}", kind.name()))
        .no_binary_name(true);
    let cmd = <InputArgs as Args>::augment_args(cmd);
    let cmd = <FilterArgs as Args>::augment_args(cmd);

    match SPECIFIC_ARGS.iter().find(|(k, _)| *k == kind) {
        Some((_, augment)) => augment(cmd),
        None => cmd,
    }
}
