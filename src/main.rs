fn main() -> anyhow::Result<()> {
    let command_line_interface = schema2ts::cli::CommandLineInterface::load();
    command_line_interface.run()
}
