//! Helpers shared between the test modules.

/// Skip the enclosing test when an external program isn't on the host.
macro_rules! require_program {
    ($name:expr) => {{
        let exists = ::std::process::Command::new($name)
            .arg("--help")
            .stdout(::std::process::Stdio::null())
            .stderr(::std::process::Stdio::null())
            .status()
            .is_ok();
        if !exists {
            eprintln!("Couldn't find \"{}\"", $name);
            return;
        }
    }};
}
