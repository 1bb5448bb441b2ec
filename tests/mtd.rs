use libmtd::mtd::{DeviceState, Error, Geometry, MemoryBackend, Mtd, PowerState};

const PAGE: u32 = 256;
const PAGES_PER_SECTOR: u32 = 4;
const SECTORS: u32 = 8;
const SECTOR_SIZE: usize = (PAGE * PAGES_PER_SECTOR) as usize;
const CAPACITY: usize = SECTOR_SIZE * SECTORS as usize;

fn geometry() -> Geometry {
    Geometry::new(PAGE, PAGES_PER_SECTOR, SECTORS).unwrap()
}

fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect()
}

#[test]
fn round_trip_on_direct_write_media() {
    let mut memory = vec![0xFF; CAPACITY];
    let backend = MemoryBackend::new(&mut memory, geometry(), true).unwrap();
    let mut device = Mtd::new(backend, geometry());
    device.init().unwrap();
    assert_eq!(device.state(), DeviceState::Ready);

    let data = pattern(700, 3);
    device.write_raw(&data, 123).unwrap();

    let mut read_back = vec![0u8; data.len()];
    device.read(&mut read_back, 123).unwrap();
    assert_eq!(read_back, data);

    // Overwrite in place and read again: direct-write media replace bytes.
    let data2 = pattern(700, 77);
    device.write_raw(&data2, 123).unwrap();
    device.read(&mut read_back, 123).unwrap();
    assert_eq!(read_back, data2);
}

#[test]
fn erase_yields_erased_value() {
    let mut memory = vec![0u8; CAPACITY];
    let backend = MemoryBackend::new(&mut memory, geometry(), false).unwrap();
    let mut device = Mtd::new(backend, geometry());
    device.init().unwrap();

    device.erase(SECTOR_SIZE as u32, 2 * SECTOR_SIZE as u32).unwrap();

    let mut buf = vec![0u8; 2 * SECTOR_SIZE];
    device.read(&mut buf, SECTOR_SIZE as u32).unwrap();
    assert!(buf.iter().all(|&b| b == 0xFF));

    // Sectors outside the erased range kept their contents.
    let mut before = vec![0u8; SECTOR_SIZE];
    device.read(&mut before, 0).unwrap();
    assert!(before.iter().all(|&b| b == 0x00));
}

#[test]
fn erase_to_custom_erased_byte() {
    let mut memory = vec![0xAA; CAPACITY];
    let backend = MemoryBackend::new(&mut memory, geometry(), false)
        .unwrap()
        .erased_byte(0x00);
    let mut device = Mtd::new(backend, geometry());
    device.init().unwrap();

    device.erase_sector(0, SECTORS).unwrap();
    let mut buf = vec![0xFF; CAPACITY];
    device.read(&mut buf, 0).unwrap();
    assert!(buf.iter().all(|&b| b == 0x00));
}

#[test]
fn emulated_write_full_image_comparison() {
    let mut memory = vec![0xFF; CAPACITY];
    let backend = MemoryBackend::new(&mut memory, geometry(), false).unwrap();
    let mut scratch = vec![0u8; SECTOR_SIZE];
    let mut device = Mtd::with_scratch(backend, geometry(), &mut scratch).unwrap();
    device.init().unwrap();

    // Lay down a known image on erased media.
    let image = pattern(CAPACITY, 9);
    device.write_raw(&image, 0).unwrap();

    // Rewrite 5 bytes in the middle of sector 2 through the emulated path.
    let sector_base = 2 * SECTOR_SIZE;
    let page = (sector_base / PAGE as usize) as u32;
    device.write(&[0x5A; 5], page, 10).unwrap();

    let mut expected = image.clone();
    expected[sector_base + 10..sector_base + 15].copy_from_slice(&[0x5A; 5]);

    let mut post = vec![0u8; CAPACITY];
    device.read(&mut post, 0).unwrap();
    assert_eq!(post, expected);
}

#[test]
fn nor_media_cannot_set_bits_without_erase() {
    let mut memory = vec![0xFF; CAPACITY];
    let backend = MemoryBackend::new(&mut memory, geometry(), false).unwrap();
    let mut device = Mtd::new(backend, geometry());
    device.init().unwrap();

    device.write_raw(&[0x0F], 0).unwrap();
    // Raw overwrite on NOR-style media only clears bits: 0x0F & 0xF0 == 0x00.
    device.write_raw(&[0xF0], 0).unwrap();
    let mut b = [0u8; 1];
    device.read(&mut b, 0).unwrap();
    assert_eq!(b[0], 0x00);

    device.erase(0, SECTOR_SIZE as u32).unwrap();
    device.read(&mut b, 0).unwrap();
    assert_eq!(b[0], 0xFF);
}

#[test]
fn power_transitions_leave_handle_ready() {
    let mut memory = vec![0xFF; CAPACITY];
    let backend = MemoryBackend::new(&mut memory, geometry(), false).unwrap();
    let mut device = Mtd::new(backend, geometry());

    assert_eq!(device.set_power(PowerState::Down), Err(Error::NotReady));
    device.init().unwrap();
    device.set_power(PowerState::Down).unwrap();
    assert_eq!(device.state(), DeviceState::Ready);
    device.set_power(PowerState::Up).unwrap();

    // This backend services requests regardless of power state.
    let mut buf = [0u8; 4];
    device.read(&mut buf, 0).unwrap();
}

#[test]
fn backend_slice_must_match_capacity() {
    let mut memory = vec![0xFF; CAPACITY - 1];
    assert!(matches!(
        MemoryBackend::new(&mut memory, geometry(), false),
        Err(Error::InvalidArgument)
    ));
}

#[test]
fn into_backend_returns_the_media() {
    let mut memory = vec![0xFF; CAPACITY];
    let backend = MemoryBackend::new(&mut memory, geometry(), true).unwrap();
    let mut device = Mtd::new(backend, geometry());
    device.init().unwrap();
    device.write_raw(b"persist", 0).unwrap();

    let backend = device.into_backend();
    assert_eq!(&backend.contents()[..7], b"persist");
}
