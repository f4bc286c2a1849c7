#![cfg(feature = "cli")]

use std::net::UdpSocket;
use std::process::Command;
use std::thread;
use std::time::Duration;

use bytes::BytesMut;
use siyi::frame::{decode_frame, encode_frame, Command as Cmd};

fn siyi() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_siyi"));
    command.arg("--log-level").arg("error");
    command
}

#[test]
fn encode_prints_reference_frame() {
    let output = siyi()
        .args(["--format", "json", "encode", "acquire_gimbal_attitude"])
        .output()
        .expect("encode should run");

    assert!(output.status.success());
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("encode should emit json");
    assert_eq!(payload["frame"], "556601000000000de805");
    assert_eq!(payload["command_id"], 13);
}

#[test]
fn encode_accepts_hex_id_and_payload() {
    let output = siyi()
        .args(["--format", "json", "encode", "0x08", "01"])
        .output()
        .expect("encode should run");

    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["command"], "gimbal_center");
    assert_eq!(payload["frame"], "556601010000000801d112");
}

#[test]
fn decode_prints_typed_response() {
    let output = siyi()
        .args(["--format", "json", "decode", "556601060007000d640000000000c663"])
        .output()
        .expect("decode should run");

    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["command"], "acquire_gimbal_attitude");
    assert_eq!(payload["sequence"], 7);
    assert_eq!(payload["response"]["type"], "gimbal_attitude");
    assert_eq!(payload["response"]["pitch"], 100);
}

#[test]
fn decode_unknown_command_has_no_response() {
    let output = siyi()
        .args(["--format", "json", "decode", "55660102000000420102dfc1"])
        .output()
        .expect("decode should run");

    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["command"], "unknown");
    assert_eq!(payload["command_id"], 0x42);
    assert!(payload["response"].is_null());
}

#[test]
fn decode_corrupt_frame_returns_60() {
    let output = siyi()
        .args(["decode", "556601010000000801d113"])
        .output()
        .expect("decode should run");

    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("checksum mismatch"));
}

#[test]
fn decode_bad_hex_returns_64() {
    let output = siyi()
        .args(["decode", "not-hex"])
        .output()
        .expect("decode should run");
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn version_reports_package_version() {
    let output = siyi().arg("version").output().expect("version should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("siyi {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn center_against_fake_camera() {
    let camera = UdpSocket::bind("127.0.0.1:0").expect("fake camera should bind");
    camera
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let port = camera.local_addr().unwrap().port();

    let fake = thread::spawn(move || {
        let mut buf = [0u8; 64];
        let (len, from) = camera.recv_from(&mut buf).expect("hardware id request");
        assert_eq!(
            decode_frame(&buf[..len]).unwrap().command,
            Cmd::AcquireHardwareId
        );

        let mut reply = BytesMut::new();
        encode_frame(Cmd::AcquireHardwareId, 0, &[0x78, 0x00], &mut reply);
        camera.send_to(&reply, from).unwrap();

        // Attitude polls may interleave with the center request.
        loop {
            let (len, _) = camera.recv_from(&mut buf).expect("center request");
            let command = decode_frame(&buf[..len]).unwrap().command;
            if command == Cmd::GimbalCenter {
                return;
            }
            assert_eq!(command, Cmd::AcquireGimbalAttitude);
        }
    });

    let output = siyi()
        .args(["--format", "json", "center"])
        .args(["--camera", "127.0.0.1", "--port", &port.to_string()])
        .args(["--local-port", "0", "--timeout", "3s"])
        .output()
        .expect("center should run");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["action"], "center");
    assert_eq!(payload["model"], "ZR30");

    fake.join().expect("fake camera should see the center request");
}

#[test]
fn silent_camera_times_out_with_124() {
    let camera = UdpSocket::bind("127.0.0.1:0").unwrap();
    let port = camera.local_addr().unwrap().port();

    let output = siyi()
        .args(["photo", "--camera", "127.0.0.1", "--port", &port.to_string()])
        .args(["--local-port", "0", "--timeout", "300ms"])
        .output()
        .expect("photo should run");

    assert_eq!(output.status.code(), Some(124));
}
