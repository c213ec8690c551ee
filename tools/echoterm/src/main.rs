use std::io::{self, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use echoline::sync::{Arc, Mutex};
use echoline::{
    parse_terminator, DataBits, EchoDriver, EchoService, EchoStats, FlowControl, FoldPolicy,
    Parity, SerialConfig, SimUart, StopBits,
};

/// Matches the buffer size of the bench demos this service descends from.
const LINE_CAPACITY: usize = 64;

#[derive(Parser, Debug)]
#[command(author, version, about = "Case-folding line-echo service over TCP or a serial port")]
struct Opts {
    /// TCP listen address for echo connections
    #[arg(long = "listen", default_value = "0.0.0.0:7801", value_name = "ADDR")]
    listen_addr: String,

    /// Serve a serial device instead of TCP (e.g. /dev/ttyUSB0)
    #[arg(long = "serial", value_name = "DEV")]
    serial: Option<String>,

    /// Baud rate for --serial
    #[arg(long = "baud", default_value_t = 115_200)]
    baud: u32,

    /// Case-fold policy applied to echoed bytes
    #[arg(long = "fold", default_value = "upper", value_name = "POLICY")]
    fold: FoldPolicy,

    /// Line terminator: cr, lf or a hex byte like 0x0a
    #[arg(long = "terminator", default_value = "cr", value_name = "NAME")]
    terminator: String,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    let terminator = parse_terminator(&opts.terminator)?;

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
        })
        .context("installing Ctrl-C handler")?;
    }

    let totals: Arc<Mutex<EchoStats>> = Arc::new(Mutex::new(EchoStats::default()));

    let result = match &opts.serial {
        Some(device) => run_serial(device, &opts, terminator, &running, &totals),
        None => run_tcp(&opts, terminator, &running, &totals),
    };

    print_totals(&totals.lock());
    result
}

fn new_driver(fold: FoldPolicy, terminator: u8) -> EchoDriver<SimUart, LINE_CAPACITY> {
    let service = EchoService::new().with_fold(fold).with_terminator(terminator);
    let mut driver = EchoDriver::new(SimUart::new(), service);
    driver.start();
    driver
}

fn run_tcp(
    opts: &Opts,
    terminator: u8,
    running: &Arc<AtomicBool>,
    totals: &Arc<Mutex<EchoStats>>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&opts.listen_addr)
        .with_context(|| format!("binding {}", opts.listen_addr))?;
    listener.set_nonblocking(true)?;
    println!(
        "echoterm listening on tcp://{} (fold={}, terminator={:#04x})",
        opts.listen_addr, opts.fold, terminator
    );

    let fold = opts.fold;
    while running.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, peer)) => {
                println!("connection from {}", peer.to_string().cyan());
                let running = Arc::clone(running);
                let totals = Arc::clone(totals);
                thread::spawn(move || {
                    match serve_stream(stream, fold, terminator, &running) {
                        Ok(stats) => {
                            accumulate(&totals, &stats);
                            print_session(&peer.to_string(), &stats);
                        }
                        Err(err) => eprintln!("connection error: {err}"),
                    }
                });
            }
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(Duration::from_millis(50));
            }
            Err(err) => {
                eprintln!("accept error: {err}");
                break;
            }
        }
    }

    Ok(())
}

fn serve_stream(
    mut stream: TcpStream,
    fold: FoldPolicy,
    terminator: u8,
    running: &Arc<AtomicBool>,
) -> anyhow::Result<EchoStats> {
    stream.set_read_timeout(Some(Duration::from_millis(100)))?;
    let mut driver = new_driver(fold, terminator);
    let mut buf = [0u8; 256];

    while running.load(Ordering::SeqCst) {
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => driver.device_mut().inject(&buf[..n]),
            Err(err)
                if err.kind() == io::ErrorKind::WouldBlock
                    || err.kind() == io::ErrorKind::TimedOut => {}
            Err(err) => return Err(err.into()),
        }

        driver.run_until_idle();
        let out = driver.device_mut().take_transmitted();
        if !out.is_empty() {
            stream.write_all(&out)?;
        }
    }

    Ok(driver.stats())
}

fn run_serial(
    device: &str,
    opts: &Opts,
    terminator: u8,
    running: &Arc<AtomicBool>,
    totals: &Arc<Mutex<EchoStats>>,
) -> anyhow::Result<()> {
    let config = SerialConfig::at_baud(opts.baud);
    let mut port = open_port(device, &config)?;
    println!(
        "echoterm serving {} at {} baud (fold={}, terminator={:#04x})",
        device.cyan(),
        config.baud_rate,
        opts.fold,
        terminator
    );

    let mut driver = new_driver(opts.fold, terminator);
    let mut buf = [0u8; 256];

    while running.load(Ordering::SeqCst) {
        match port.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => driver.device_mut().inject(&buf[..n]),
            Err(err) if err.kind() == io::ErrorKind::TimedOut => {}
            Err(err) => return Err(err.into()),
        }

        driver.run_until_idle();
        let out = driver.device_mut().take_transmitted();
        if !out.is_empty() {
            port.write_all(&out)?;
        }
    }

    let stats = driver.stats();
    accumulate(totals, &stats);
    print_session(device, &stats);
    Ok(())
}

/// Map the wire configuration onto the serialport backend.
fn open_port(
    device: &str,
    config: &SerialConfig,
) -> anyhow::Result<Box<dyn serialport::SerialPort>> {
    let data_bits = match config.data_bits {
        DataBits::Five => serialport::DataBits::Five,
        DataBits::Six => serialport::DataBits::Six,
        DataBits::Seven => serialport::DataBits::Seven,
        DataBits::Eight => serialport::DataBits::Eight,
    };
    let stop_bits = match config.stop_bits {
        StopBits::One => serialport::StopBits::One,
        StopBits::Two => serialport::StopBits::Two,
    };
    let parity = match config.parity {
        Parity::None => serialport::Parity::None,
        Parity::Even => serialport::Parity::Even,
        Parity::Odd => serialport::Parity::Odd,
    };
    let flow_control = match config.flow_control {
        FlowControl::None => serialport::FlowControl::None,
        FlowControl::RtsCts => serialport::FlowControl::Hardware,
    };

    serialport::new(device, config.baud_rate)
        .data_bits(data_bits)
        .stop_bits(stop_bits)
        .parity(parity)
        .flow_control(flow_control)
        .timeout(Duration::from_millis(100))
        .open()
        .with_context(|| format!("opening {device}"))
}

fn accumulate(totals: &Arc<Mutex<EchoStats>>, stats: &EchoStats) {
    let mut guard = totals.lock();
    guard.bytes_received += stats.bytes_received;
    guard.bytes_transmitted += stats.bytes_transmitted;
    guard.lines_echoed += stats.lines_echoed;
    guard.overruns += stats.overruns;
}

fn print_session(label: &str, stats: &EchoStats) {
    println!(
        "{} {label}: {} lines, {} bytes in, {} bytes out{}",
        "session closed".bold(),
        stats.lines_echoed.to_string().green(),
        stats.bytes_received,
        stats.bytes_transmitted,
        if stats.overruns > 0 {
            format!(", {} overruns", stats.overruns.to_string().red())
        } else {
            String::new()
        }
    );
}

fn print_totals(totals: &EchoStats) {
    println!(
        "{}: {} lines, {} bytes in, {} bytes out, {} overruns",
        "totals".bold(),
        totals.lines_echoed,
        totals.bytes_received,
        totals.bytes_transmitted,
        totals.overruns
    );
}
