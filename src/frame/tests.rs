#![cfg(test)]

use crate::symbol::{Location, TableResolver};
use super::{Frame, Verb};


const METHOD_PC: usize = 0x1000;
const WORK_PC: usize = 0x2000;
const NO_FILE_PC: usize = 0x3000;

fn resolver() -> TableResolver {
    TableResolver::new()
        .with(METHOD_PC, Location::new(
            "github.com/example/pkg.(*Type).Method",
            "/home/dev/go/src/github.com/example/pkg/type.go",
            17,
        ))
        .with(WORK_PC, Location::new("main.doWork", "/home/dev/app/main.go", 42))
        .with(NO_FILE_PC, Location::new("errstack::frame::tests::helper", "unknown", 0))
}

// frames hold return addresses, one past the pc
fn frame_at(pc: usize) -> Frame { Frame::new(pc + 1) }


#[test]
fn frame_pc_removes_return_address_bias() {
    let frame = Frame::new(0x2001);
    assert_eq!(frame.handle(), 0x2001);
    assert_eq!(frame.pc(), 0x2000);

    // the handle itself is not a resolvable pc
    let location = Frame::new(WORK_PC).resolve(&resolver());
    assert!(location.is_unknown());

    let location = frame_at(WORK_PC).resolve(&resolver());
    assert_eq!(location, Location::new("main.doWork", "/home/dev/app/main.go", 42));
}

#[test]
fn frame_formats_each_verb() {
    let resolver = resolver();
    let frame = frame_at(METHOD_PC);

    assert_eq!(frame.render(&resolver, Verb::File, false), "type.go");
    assert_eq!(
        frame.render(&resolver, Verb::File, true),
        "github.com/example/pkg.(*Type).Method\n\t/home/dev/go/src/github.com/example/pkg/type.go",
    );
    assert_eq!(frame.render(&resolver, Verb::Line, false), "17");
    assert_eq!(frame.render(&resolver, Verb::Line, true), "17");
    assert_eq!(frame.render(&resolver, Verb::Name, false), "Method");
    assert_eq!(frame.render(&resolver, Verb::Composite, false), "type.go:17");
    assert_eq!(
        frame.render(&resolver, Verb::Composite, true),
        "github.com/example/pkg.(*Type).Method\n\t/home/dev/go/src/github.com/example/pkg/type.go:17",
    );
}

#[test]
fn composite_joins_file_and_line() {
    let resolver = resolver();
    let frames = [frame_at(METHOD_PC), frame_at(WORK_PC), frame_at(NO_FILE_PC), Frame::new(0), Frame::new(0xdead)];

    for frame in frames {
        for detailed in [false, true] {
            let expected = format!(
                "{}:{}",
                frame.render(&resolver, Verb::File, detailed),
                frame.render(&resolver, Verb::Line, detailed),
            );
            assert_eq!(frame.render(&resolver, Verb::Composite, detailed), expected, "{:?}", frame);
        }
    }
}

#[test]
fn unknown_frames_use_sentinels() {
    let resolver = resolver();

    for frame in [Frame::new(0), Frame::new(1), Frame::new(0xdead)] {
        let location = frame.resolve(&resolver);
        assert_eq!(location.file, "unknown");
        assert_eq!(location.function, "unknown");
        assert_eq!(location.line, 0);

        assert_eq!(frame.render(&resolver, Verb::File, false), "unknown");
        assert_eq!(frame.render(&resolver, Verb::File, true), "unknown\n\tunknown");
        assert_eq!(frame.render(&resolver, Verb::Line, false), "0");
        assert_eq!(frame.render(&resolver, Verb::Name, false), "unknown");
        assert_eq!(frame.render(&resolver, Verb::Composite, false), "unknown:0");
        assert_eq!(frame.marshal_text_with(&resolver), "unknown");
    }
}

#[test]
fn marshal_text_is_a_single_line() {
    let resolver = resolver();

    let text = frame_at(WORK_PC).marshal_text_with(&resolver);
    assert_eq!(text, "main.doWork /home/dev/app/main.go:42");

    let text = frame_at(METHOD_PC).marshal_text_with(&resolver);
    assert_eq!(text, "github.com/example/pkg.(*Type).Method /home/dev/go/src/github.com/example/pkg/type.go:17");

    for frame in [frame_at(METHOD_PC), frame_at(WORK_PC), frame_at(NO_FILE_PC), Frame::new(0)] {
        let text = frame.marshal_text_with(&resolver);
        assert!(!text.chars().any(char::is_control), "control character in {:?}", text);
    }
}

#[test]
fn known_function_without_file_still_marshals() {
    let resolver = resolver();
    let frame = frame_at(NO_FILE_PC);

    assert_eq!(frame.marshal_text_with(&resolver), "errstack::frame::tests::helper unknown:0");
    assert_eq!(frame.render(&resolver, Verb::Name, false), "helper");
}

#[test]
fn verb_characters_dispatch() {
    let resolver = resolver();
    let frame = frame_at(WORK_PC);

    assert_eq!(frame.render_verb(&resolver, 's', false), "main.go");
    assert_eq!(frame.render_verb(&resolver, 'd', false), "42");
    assert_eq!(frame.render_verb(&resolver, 'n', false), "doWork");
    assert_eq!(frame.render_verb(&resolver, 'v', false), "main.go:42");
    assert_eq!(frame.render_verb(&resolver, 'v', true), "main.doWork\n\t/home/dev/app/main.go:42");

    for verb in [Verb::File, Verb::Line, Verb::Name, Verb::Composite] {
        assert_eq!(Verb::from_char(verb.as_char()), Some(verb));
    }
}

#[test]
fn unrecognised_verbs_write_nothing() {
    let resolver = resolver();
    let frame = frame_at(WORK_PC);

    for verb in ['x', 'q', '#', 'S', ' '] {
        assert_eq!(Verb::from_char(verb), None);
        assert_eq!(frame.render_verb(&resolver, verb, false), "");
        assert_eq!(frame.render_verb(&resolver, verb, true), "");
    }
}

#[test]
fn display_adapter_honours_plus_flag() {
    let resolver = resolver();
    let frame = frame_at(WORK_PC);

    assert_eq!(format!("{}", frame.display_with(&resolver, Verb::Composite)), "main.go:42");
    assert_eq!(format!("{:+}", frame.display_with(&resolver, Verb::Composite)), "main.doWork\n\t/home/dev/app/main.go:42");
    assert_eq!(format!("{}", frame.display_with(&resolver, Verb::Name)), "doWork");
    assert_eq!(format!("{:+}", frame.display_with(&resolver, Verb::Line)), "42");
}

#[test]
fn resolution_is_repeatable() {
    let resolver = resolver();
    let frame = frame_at(METHOD_PC);

    let first = frame.render(&resolver, Verb::Composite, true);
    let second = frame.render(&resolver, Verb::Composite, true);
    assert_eq!(first, second);
    assert_eq!(frame, Frame::from(METHOD_PC + 1));
}

#[test]
fn debug_shows_raw_handle() {
    assert_eq!(format!("{:?}", Frame::new(0x2a)), "Frame(0x2a)");
}
