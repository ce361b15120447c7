use clap::Parser;

/// The program has a single fixed behaviour; only `--help` and `--version`
/// are accepted.
#[derive(Parser, Debug)]
#[command(
    name = "mandelswirl",
    author,
    version,
    about = "Animated, rotating Mandelbrot fractal in an 800x800 window",
    long_about = "Opens an 800x800 window and renders an animated, rotating Mandelbrot \
                  fractal with a GLSL fragment shader at 60 frames per second.\n\n\
                  Press Escape or close the window to quit. Set RUST_LOG (for example \
                  RUST_LOG=debug) to change log verbosity."
)]
pub struct Cli {}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_without_arguments() {
        assert!(Cli::try_parse_from(["mandelswirl"]).is_ok());
    }

    #[test]
    fn rejects_unknown_arguments() {
        assert!(Cli::try_parse_from(["mandelswirl", "--fps", "30"]).is_err());
        assert!(Cli::try_parse_from(["mandelswirl", "shader.frag"]).is_err());
    }
}
