//! # Help Text
//!
//! Help message for bot commands.
//! Displayed to the user via the `.help` command.

pub const MAIN: &str = concat!(
    "**🚢 Deploybot Help**\n",
    "Use: .command _args_\n",
    "\n",
    "* deployed in [env]: Build deployed for every app in an environment\n",
    "* builds for [app|all]: Most recent successful CI builds\n",
    "* diff [from] [to]: GitHub compare links between two environments (or `latest`)\n",
    "* help\n"
);
