use hickory_proto::op::Message;
use hickory_proto::rr::Record;
use std::fmt::Write;

/// Renders a decoded message in the familiar dig layout: header line,
/// flags and counts, then one block per non-empty section.
pub fn render_message(message: &Message) -> String {
    let mut out = String::with_capacity(256);

    let _ = writeln!(
        out,
        ";; ->>HEADER<<- opcode: {:?}, status: {}, id: {}",
        message.op_code(),
        message.response_code(),
        message.id()
    );

    let mut flags = Vec::with_capacity(5);
    if message.message_type() == hickory_proto::op::MessageType::Response {
        flags.push("qr");
    }
    if message.authoritative() {
        flags.push("aa");
    }
    if message.truncated() {
        flags.push("tc");
    }
    if message.recursion_desired() {
        flags.push("rd");
    }
    if message.recursion_available() {
        flags.push("ra");
    }

    let _ = writeln!(
        out,
        ";; flags: {}; QUERY: {}, ANSWER: {}, AUTHORITY: {}, ADDITIONAL: {}",
        flags.join(" "),
        message.queries().len(),
        message.answers().len(),
        message.name_servers().len(),
        message.additionals().len()
    );

    out.push_str("\n;; QUESTION SECTION:\n");
    for query in message.queries() {
        let _ = writeln!(
            out,
            ";{}\t{}\t{}",
            query.name(),
            query.query_class(),
            query.query_type()
        );
    }

    write_section(&mut out, "ANSWER", message.answers());
    write_section(&mut out, "AUTHORITY", message.name_servers());
    write_section(&mut out, "ADDITIONAL", message.additionals());

    out
}

fn write_section(out: &mut String, title: &str, records: &[Record]) {
    if records.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n;; {title} SECTION:");
    for record in records {
        let _ = writeln!(out, "{record}");
    }
}
