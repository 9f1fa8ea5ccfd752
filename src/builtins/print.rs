use crate::{
    environment::Environment,
    exception::RunResult,
    expressions::read_element,
    graph::PrintArg,
    io::PrintWriter,
};

/// Statement-level `print`: formats its single optional argument per
/// [`Value`](crate::value::Value)'s `Display` impl and always emits a
/// trailing newline.
pub(crate) fn print_statement(
    arg: &PrintArg,
    env: &impl Environment,
    writer: &mut impl PrintWriter,
    line: u32,
) -> RunResult<()> {
    if let PrintArg::Element(element) = arg {
        let value = read_element(element, env, line)?;
        writer.stdout_write(&value.to_string());
    }
    writer.stdout_push('\n');
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{environment::MapEnvironment, graph::Element, io::CollectStringPrint, value::Value};

    #[test]
    fn print_nothing_emits_blank_line() {
        let env = MapEnvironment::new();
        let mut writer = CollectStringPrint::new();
        print_statement(&PrintArg::Nothing, &env, &mut writer, 1).unwrap();
        assert_eq!(writer.output(), "\n");
    }

    #[test]
    fn print_identifier_formats_via_display() {
        let mut env = MapEnvironment::new();
        env.write_by_name("x".into(), Value::Real(3.0));
        let mut writer = CollectStringPrint::new();
        print_statement(&PrintArg::Element(Element::Identifier("x".into())), &env, &mut writer, 1).unwrap();
        assert_eq!(writer.output(), "3.000000\n");
    }
}
