use nu_ansi_term::Color::{Cyan, Green, Red};

/// Print info on console.
pub fn info(message: &str, colours: bool) {
    match colours {
        true => println!("{}", Cyan.bold().italic().paint(message)),
        false => println!("{message}"),
    }
}

/// Print a warning, and the data it is about, on console.
pub fn warn(message: &str, data: &str, colours: bool) {
    match colours {
        true => println!(
            "{} \n {} ",
            Cyan.bold().italic().paint(message),
            Red.bold().italic().paint(data)
        ),
        false => println!("{message} \n {data} "),
    }
}

/// Print that a resource has finished synchronising.
pub fn synced(resource: &str, reason: &str, colours: bool) {
    let status = "synced";
    match colours {
        true => println!("{}: {} ({reason})", resource, Green.bold().paint(status)),
        false => println!("{resource}: {status} ({reason})"),
    }
}

/// Print that a resource is still synchronising, and why.
pub fn not_synced(resource: &str, reason: &str, colours: bool) {
    let status = "not synced";
    match colours {
        true => println!(
            "{}: {} ({})",
            resource,
            Red.bold().paint(status),
            Red.italic().paint(reason)
        ),
        false => println!("{resource}: {status} ({reason})"),
    }
}
